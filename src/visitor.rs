//! Markup traversal over an oxc `Program`.
//!
//! `MarkupVisitor` is the single traversal mechanism for JSX tag names.
//!
//! Rules:
//! 1. The driver (`MarkupWalker`) visits nodes in source order.
//! 2. `enter` is called for every opening tag, closing tag and member-path name.
//! 3. Returning `WalkControl::SkipChildren` prunes that node's subtree; the driver
//!    never descends into it.

use oxc_ast::ast::{
    JSXClosingElement, JSXElementName, JSXMemberExpression, JSXMemberExpressionObject,
    JSXOpeningElement, Program,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    SkipChildren,
}

pub enum MarkupNode<'n, 'a> {
    OpeningTag(&'n JSXOpeningElement<'a>),
    ClosingTag(&'n JSXClosingElement<'a>),
    MemberPath(&'n JSXMemberExpression<'a>),
}

pub trait MarkupVisitor<'a> {
    fn enter(&mut self, node: MarkupNode<'_, 'a>) -> WalkControl;
}

/// Adapts a `MarkupVisitor` to oxc's `Visit`, honouring `SkipChildren`.
pub struct MarkupWalker<'v, V> {
    visitor: &'v mut V,
}

impl<'v, V> MarkupWalker<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self { visitor }
    }
}

impl<'a, V: MarkupVisitor<'a>> Visit<'a> for MarkupWalker<'_, V> {
    fn visit_jsx_opening_element(&mut self, it: &JSXOpeningElement<'a>) {
        if self.visitor.enter(MarkupNode::OpeningTag(it)) == WalkControl::Continue {
            walk::walk_jsx_opening_element(self, it);
        }
    }

    fn visit_jsx_closing_element(&mut self, it: &JSXClosingElement<'a>) {
        if self.visitor.enter(MarkupNode::ClosingTag(it)) == WalkControl::Continue {
            walk::walk_jsx_closing_element(self, it);
        }
    }

    fn visit_jsx_member_expression(&mut self, it: &JSXMemberExpression<'a>) {
        if self.visitor.enter(MarkupNode::MemberPath(it)) == WalkControl::Continue {
            walk::walk_jsx_member_expression(self, it);
        }
    }
}

pub fn walk_program<'a, V: MarkupVisitor<'a>>(visitor: &mut V, program: &Program<'a>) {
    MarkupWalker::new(visitor).visit_program(program);
}

/// Tag name text and the span of the name token.
///
/// Namespaced names (`svg:rect`) are not identifier references and yield `None`.
pub fn tag_name(name: &JSXElementName<'_>) -> Option<(String, Span)> {
    let text = match name {
        JSXElementName::Identifier(id) => id.name.to_string(),
        JSXElementName::IdentifierReference(id) => id.name.to_string(),
        JSXElementName::MemberExpression(member) => member_path(member),
        JSXElementName::ThisExpression(_) => "this".to_string(),
        JSXElementName::NamespacedName(_) => return None,
    };
    Some((text, name.span()))
}

/// `A.B.C` for nested member names.
pub fn member_path(member: &JSXMemberExpression<'_>) -> String {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => id.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(inner) => member_path(inner),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{}.{}", object, member.property.name)
}
