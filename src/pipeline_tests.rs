#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::error::{PreppyError, Result};
    use crate::pipeline::{IdentityStage, InputModule, OutputChunk, Pipeline, SourceUnit};
    use crate::renamer::RenameStage;

    const APP: &str = "import { Layout } from './layout';\n\
                       import * as UI from './ui';\n\
                       export const App = () => <Layout><UI.Button>Go</UI.Button></Layout>;";

    #[test]
    fn test_identity_stage_restores_original_tags() {
        let pipeline = Pipeline::new();
        let units = vec![
            SourceUnit::new("app.jsx", APP),
            SourceUnit::new("util.js", "export const twice = (n) => n * 2;"),
        ];
        let chunks = pipeline.run(&units, &IdentityStage).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].code, format!("{}\n;", APP));
        assert!(chunks[0].map.is_some());
        assert_eq!(chunks[1].code, "export const twice = (n) => n * 2;");
        assert!(chunks[1].map.is_none());
    }

    #[test]
    fn test_renamed_bindings_flow_into_tags() {
        let pipeline = Pipeline::new();
        let units = vec![SourceUnit::new("app.jsx", APP)];
        let stage = RenameStage::default()
            .rename("Layout", "L0")
            .rename("UI", "U1");
        let chunks = pipeline.run(&units, &stage).unwrap();

        let code = &chunks[0].code;
        assert!(code.contains("import { Layout as L0 } from './layout';"));
        assert!(code.contains("import * as U1 from './ui';"));
        assert!(code.contains("<L0><U1.Button>Go</U1.Button></L0>;"));
        assert!(!code.contains("PREPPY_JSX_ID_"));
        assert!(!code.contains("__PREPPY_JSX_NAMES__"));
    }

    #[test]
    fn test_stage_that_drops_sentinel_fails_resolution() {
        let pipeline = Pipeline::new();
        let units = vec![SourceUnit::new("app.jsx", APP)];
        let aggressive_dce = |modules: Vec<InputModule>| -> Result<Vec<OutputChunk>> {
            Ok(modules
                .into_iter()
                .map(|m| OutputChunk {
                    code: m
                        .code
                        .split(";__PREPPY_JSX_NAMES__")
                        .next()
                        .unwrap_or_default()
                        .to_string(),
                    file_name: m.id,
                    map: None,
                })
                .collect())
        };

        let err = pipeline.run(&units, &aggressive_dce).unwrap_err();
        match err {
            PreppyError::UnresolvedMarker { tag, .. } => assert_eq!(tag.as_deref(), Some("Layout")),
            other => panic!("expected unresolved marker, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_errors_propagate() {
        let pipeline = Pipeline::new();
        let units = vec![SourceUnit::new("app.jsx", APP)];
        let failing = |_: Vec<InputModule>| -> Result<Vec<OutputChunk>> {
            Err(PreppyError::stage("bundler crashed"))
        };
        let err = pipeline.run(&units, &failing).unwrap_err();
        assert_eq!(err.code(), "PREPPY-ERR-STAGE-001");
    }

    #[test]
    fn test_parallel_units_get_unique_markers() {
        let pipeline = Pipeline::new();
        let units: Vec<_> = (0..64)
            .map(|i| SourceUnit::new(format!("unit{}.jsx", i), "<Shared/>;"))
            .collect();
        let modules = pipeline.stabilize_units(&units).unwrap();

        let markers: HashSet<_> = modules
            .iter()
            .map(|m| m.code.split("/>").next().unwrap().trim_start_matches('<').to_string())
            .collect();
        assert_eq!(markers.len(), 64);
        assert_eq!(pipeline.stabilizer().sequence().issued(), 64);
        assert_eq!(modules[10].id, "unit10.jsx");
    }

    #[test]
    fn test_parse_failure_aborts_build() {
        let pipeline = Pipeline::new();
        let units = vec![
            SourceUnit::new("ok.jsx", "<A/>;"),
            SourceUnit::new("bad.jsx", "<A>"),
        ];
        let err = pipeline.run(&units, &IdentityStage).unwrap_err();
        assert!(matches!(err, PreppyError::Parse { ref unit, .. } if unit == "bad.jsx"));
    }

    #[test]
    fn test_trailing_line_comment_does_not_hide_sentinel_from_stage() {
        let pipeline = Pipeline::new();
        let units = vec![SourceUnit::new(
            "app.jsx",
            "import { Layout } from './layout';\nexport const App = () => <Layout/>;\n// end",
        )];
        let stage = RenameStage::default().rename("Layout", "L0");
        let chunks = pipeline.run(&units, &stage).unwrap();

        assert_eq!(
            chunks[0].code,
            "import { Layout as L0 } from './layout';\nexport const App = () => <L0/>;\n// end\n;"
        );
    }
}
