use std::fmt::Display;

use crate::Span;

use super::arena::NodeId;

/// A single AST node: its variant plus the source region it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// The closed set of AST variants produced by the parser.
///
/// Children are referenced by [`NodeId`] into the owning arena; the tree
/// is strictly top-down with no sharing.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Statements
    Module {
        name: String,
        body: Vec<NodeId>,
    },
    Import {
        path: String,
    },
    Include {
        path: String,
    },
    Def {
        name: String,
        params: Vec<Param>,
        body: DefBody,
    },
    Macro {
        name: String,
        params: Vec<Param>,
        body: DefBody,
    },
    Let {
        name: String,
        value: NodeId,
    },
    Var {
        name: String,
        value: NodeId,
    },
    If {
        condition: NodeId,
        then_body: NodeId,
        elif_clauses: Vec<(NodeId, NodeId)>,
        else_body: Option<NodeId>,
    },
    Match {
        value: NodeId,
        arms: Vec<NodeId>,
    },
    MatchArm {
        pattern: NodeId,
        guard: Option<NodeId>,
        body: NodeId,
    },
    Foreach {
        variable: String,
        iterable: NodeId,
        body: Vec<NodeId>,
    },
    While {
        condition: NodeId,
        body: Vec<NodeId>,
    },
    Until {
        condition: NodeId,
        body: Vec<NodeId>,
    },
    Loop {
        body: Vec<NodeId>,
    },
    Break,
    Continue,
    Block {
        body: Vec<NodeId>,
    },

    // Expressions
    Pipe {
        stages: Vec<NodeId>,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Assignment {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    QualifiedAccess {
        module: String,
        name: String,
        arguments: Option<Vec<NodeId>>,
    },
    Selector {
        base: Option<NodeId>,
        suffixes: Vec<SelectorSuffix>,
    },
    Call {
        name: String,
        arguments: Vec<NodeId>,
    },
    Array {
        elements: Vec<NodeId>,
    },
    Dict {
        entries: Vec<NodeId>,
    },
    DictEntry {
        key: NodeId,
        value: NodeId,
    },
    Group {
        inner: NodeId,
    },
    FunctionLiteral {
        params: Vec<Param>,
        body: NodeId,
    },
    InterpolatedString {
        parts: Vec<StringPart>,
    },
    Identifier {
        name: String,
    },
    SelfValue,
    Nodes,
    Literal(Literal),

    // Patterns
    LiteralPattern(Literal),
    TypePattern(TypeName),
    ArrayPattern {
        elements: Vec<NodeId>,
    },
    DictPattern {
        keys: Vec<String>,
    },
    WildcardPattern,
    VariablePattern {
        name: String,
    },
    RestPattern {
        name: String,
    },
}

impl NodeKind {
    /// Short human-readable name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Module { .. } => "a module",
            NodeKind::Import { .. } => "an import",
            NodeKind::Include { .. } => "an include",
            NodeKind::Def { .. } => "a definition",
            NodeKind::Macro { .. } => "a macro",
            NodeKind::Let { .. } => "a let binding",
            NodeKind::Var { .. } => "a var binding",
            NodeKind::If { .. } => "an if expression",
            NodeKind::Match { .. } => "a match expression",
            NodeKind::MatchArm { .. } => "a match arm",
            NodeKind::Foreach { .. } => "a foreach loop",
            NodeKind::While { .. } => "a while loop",
            NodeKind::Until { .. } => "an until loop",
            NodeKind::Loop { .. } => "a loop",
            NodeKind::Break => "a break",
            NodeKind::Continue => "a continue",
            NodeKind::Block { .. } => "a block",
            NodeKind::Pipe { .. } => "a pipeline",
            NodeKind::Binary { .. } => "a binary expression",
            NodeKind::Unary { .. } => "a unary expression",
            NodeKind::Assignment { .. } => "an assignment",
            NodeKind::QualifiedAccess { .. } => "a qualified access",
            NodeKind::Selector { .. } => "a selector chain",
            NodeKind::Call { .. } => "a call",
            NodeKind::Array { .. } => "an array",
            NodeKind::Dict { .. } => "a dict",
            NodeKind::DictEntry { .. } => "a dict entry",
            NodeKind::Group { .. } => "a group",
            NodeKind::FunctionLiteral { .. } => "a function literal",
            NodeKind::InterpolatedString { .. } => "an interpolated string",
            NodeKind::Identifier { .. } => "an identifier",
            NodeKind::SelfValue => "self",
            NodeKind::Nodes => "nodes",
            NodeKind::Literal(_) => "a literal",
            NodeKind::LiteralPattern(_) => "a literal pattern",
            NodeKind::TypePattern(_) => "a type pattern",
            NodeKind::ArrayPattern { .. } => "an array pattern",
            NodeKind::DictPattern { .. } => "a dict pattern",
            NodeKind::WildcardPattern => "a wildcard pattern",
            NodeKind::VariablePattern { .. } => "a variable pattern",
            NodeKind::RestPattern { .. } => "a rest pattern",
        }
    }
}

/// One entry of a parameter list.
///
/// At most one parameter may be variadic and it must be last; the parser
/// enforces this when the list is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<NodeId>,
    pub variadic: bool,
}

/// Body of a `def`/`macro`: either `: expr;` or `: stmts end`.
#[derive(Debug, Clone, PartialEq)]
pub enum DefBody {
    Expr(NodeId),
    Block(Vec<NodeId>),
}

/// One step of a selector chain, applied to the previous step's result.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorSuffix {
    Property(String),
    /// `[expr]`; `[]` (no index) selects everything.
    Index(Option<NodeId>),
    Slice(NodeId, NodeId),
}

/// One piece of an interpolated string, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Text(String),
    /// `$$`, a literal dollar sign.
    Dollar,
    Expr(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    None,
    Symbol(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Range,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Range => "..",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    PipeAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    FloorDivAssign,
}

impl Display for AssignOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            AssignOp::Assign => "=",
            AssignOp::PipeAssign => "|=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::FloorDivAssign => "//=",
        };
        write!(f, "{}", text)
    }
}

/// The closed set of names usable in a type pattern (`:string` etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    String,
    Number,
    Array,
    Dict,
    Bool,
    None,
    Markdown,
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TypeName::String => "string",
            TypeName::Number => "number",
            TypeName::Array => "array",
            TypeName::Dict => "dict",
            TypeName::Bool => "bool",
            TypeName::None => "none",
            TypeName::Markdown => "markdown",
        };
        write!(f, "{}", text)
    }
}
