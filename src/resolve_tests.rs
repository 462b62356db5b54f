#[cfg(test)]
mod tests {
    use crate::error::PreppyError;
    use crate::resolve::Resolver;
    use crate::stabilize::Stabilizer;

    #[test]
    fn test_round_trip_with_identity_optimizer() {
        let stabilizer = Stabilizer::new();
        let source = "const a = <Foo.Bar/>;\nconst b = <Foo.Bar>text</Foo.Bar>;";
        let unit = stabilizer.stabilize(source, "unit.jsx").unwrap().unwrap();

        let resolved = Resolver::new()
            .resolve(&unit.code, "unit.js")
            .unwrap()
            .unwrap();
        // Only the separator line of the removed sentinel statement remains.
        assert_eq!(resolved, format!("{}\n;", source));
    }

    #[test]
    fn test_renamed_bindings_are_substituted() {
        let chunk = "import{Foo as a}from'lib';\
                     const x=<PREPPY_JSX_ID_7 id=\"1\"><PREPPY_JSX_ID_8/></PREPPY_JSX_ID_7>;\
                     __PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_7*/a,/*PREPPY_JSX_ID_8*/span);";
        let resolved = Resolver::new().resolve(chunk, "index.js").unwrap().unwrap();
        assert_eq!(
            resolved,
            "import{Foo as a}from'lib';const x=<a id=\"1\"><span/></a>;"
        );
    }

    #[test]
    fn test_multiple_sentinels_merge_and_trailing_semicolon_is_optional() {
        let chunk = "<PREPPY_JSX_ID_1/>;__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/A);\n\
                     <PREPPY_JSX_ID_2/>;__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_2*/B)";
        let resolved = Resolver::new().resolve(chunk, "bundle.js").unwrap().unwrap();
        assert_eq!(resolved, "<A/>;\n<B/>;");
    }

    #[test]
    fn test_chunk_without_sentinel_passes_through() {
        let result = Resolver::new()
            .resolve("console.log('hello');", "plain.js")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_marker_without_sentinel_is_fatal() {
        let stabilizer = Stabilizer::new();
        let unit = stabilizer.stabilize("<Widget/>;", "w.jsx").unwrap().unwrap();
        // Simulate dead-code elimination of the whole sentinel call.
        let chunk = unit.code.split(";__PREPPY_JSX_NAMES__").next().unwrap();

        let err = Resolver::with_origins(stabilizer.sequence())
            .resolve(chunk, "w.js")
            .unwrap_err();
        match &err {
            PreppyError::UnresolvedMarker { marker, tag, chunk } => {
                assert_eq!(marker, "PREPPY_JSX_ID_1");
                assert_eq!(tag.as_deref(), Some("Widget"));
                assert_eq!(chunk, "w.js");
            }
            other => panic!("expected unresolved marker, got {:?}", other),
        }
        assert_eq!(err.code(), "PREPPY-ERR-RESOLVE-002");
    }

    #[test]
    fn test_removed_argument_is_fatal() {
        let chunk = "<PREPPY_JSX_ID_1/>;<PREPPY_JSX_ID_2/>;\
                     __PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/A);";
        let err = Resolver::new().resolve(chunk, "c.js").unwrap_err();
        assert!(matches!(
            err,
            PreppyError::UnresolvedMarker { ref marker, .. } if marker == "PREPPY_JSX_ID_2"
        ));
    }

    #[test]
    fn test_argument_emptied_by_optimizer_is_fatal() {
        let chunk = "<PREPPY_JSX_ID_1/>;__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/);";
        let err = Resolver::new().resolve(chunk, "c.js").unwrap_err();
        assert!(matches!(err, PreppyError::UnresolvedMarker { .. }));
    }

    #[test]
    fn test_argument_without_comment_is_malformed() {
        let chunk = "<PREPPY_JSX_ID_1/>;__PREPPY_JSX_NAMES__(a);";
        let err = Resolver::new().resolve(chunk, "c.js").unwrap_err();
        assert_eq!(err.code(), "PREPPY-ERR-RESOLVE-001");
    }

    #[test]
    fn test_inlined_literal_is_rejected() {
        let chunk = "<PREPPY_JSX_ID_1/>;__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/0);";
        let err = Resolver::new().resolve(chunk, "c.js").unwrap_err();
        assert_eq!(err.code(), "PREPPY-ERR-RESOLVE-003");
    }

    #[test]
    fn test_longer_marker_ids_are_not_confused() {
        let chunk = "<PREPPY_JSX_ID_1/><PREPPY_JSX_ID_12/>;\
                     __PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_1*/One,/*PREPPY_JSX_ID_12*/Twelve);";
        let resolved = Resolver::new().resolve(chunk, "c.js").unwrap().unwrap();
        assert_eq!(resolved, "<One/><Twelve/>;");
    }

    #[test]
    fn test_round_trip_with_non_ascii_tag() {
        let stabilizer = Stabilizer::new();
        let source = "const Élan = () => null;\nconst a = <Élan/>;";
        let unit = stabilizer.stabilize(source, "elan.jsx").unwrap().unwrap();

        let resolved = Resolver::new()
            .resolve(&unit.code, "elan.js")
            .unwrap()
            .unwrap();
        assert_eq!(resolved, format!("{}\n;", source));
    }

    #[test]
    fn test_non_ascii_member_path_binding_is_accepted() {
        let chunk = "<PREPPY_JSX_ID_3/>;__PREPPY_JSX_NAMES__(/*PREPPY_JSX_ID_3*/Ωmega.$Ünit);";
        let resolved = Resolver::new().resolve(chunk, "u.js").unwrap().unwrap();
        assert_eq!(resolved, "<Ωmega.$Ünit/>;");
    }
}
