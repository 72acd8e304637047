//! Canonical source rendering of an AST.
//!
//! The printer emits source text that parses back to the same tree, so
//! `print(parse(print(parse(s))))` equals `print(parse(s))` for any
//! input `s` that parses. Grouping parentheses survive because the
//! parser keeps them as explicit nodes.

use super::{
    arena::{NodeId, Program},
    node::{DefBody, Literal, NodeKind, Param, SelectorSuffix, StringPart},
};

/// Renders a whole program, one statement per line.
pub fn print(program: &Program) -> String {
    let mut printer = Printer::new(program);
    for (index, root) in program.roots.iter().enumerate() {
        if index > 0 {
            printer.out.push('\n');
        }
        printer.write_stmt(*root);
    }
    printer.out
}

/// Renders a single node, mostly useful for diagnostics and tests.
pub fn print_node(program: &Program, id: NodeId) -> String {
    let mut printer = Printer::new(program);
    printer.write_expr(id);
    printer.out
}

struct Printer<'a> {
    program: &'a Program,
    out: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    fn new(program: &'a Program) -> Self {
        Self {
            program,
            out: String::new(),
            indent: 0,
        }
    }

    fn kind(&self, id: NodeId) -> &NodeKind {
        &self.program.node(id).kind
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn write_body(&mut self, body: &[NodeId]) {
        self.indent += 1;
        for stmt in body {
            self.out.push('\n');
            self.write_indent();
            self.write_stmt(*stmt);
        }
        self.indent -= 1;
        self.out.push('\n');
        self.write_indent();
        self.out.push_str("end");
    }

    fn write_stmt(&mut self, id: NodeId) {
        match self.kind(id).clone() {
            NodeKind::Module { name, body } => {
                self.out.push_str("module ");
                self.out.push_str(&name);
                self.write_body(&body);
            }
            NodeKind::Import { path } => {
                self.out.push_str("import ");
                self.write_quoted(&path);
            }
            NodeKind::Include { path } => {
                self.out.push_str("include ");
                self.write_quoted(&path);
            }
            NodeKind::Def { name, params, body } => {
                self.write_definition("def", &name, &params, &body);
            }
            NodeKind::Macro { name, params, body } => {
                self.write_definition("macro", &name, &params, &body);
            }
            NodeKind::Let { name, value } => {
                self.out.push_str("let ");
                self.out.push_str(&name);
                self.out.push_str(" = ");
                self.write_expr(value);
            }
            NodeKind::Var { name, value } => {
                self.out.push_str("var ");
                self.out.push_str(&name);
                self.out.push_str(" = ");
                self.write_expr(value);
            }
            NodeKind::If {
                condition,
                then_body,
                elif_clauses,
                else_body,
            } => {
                self.out.push_str("if ");
                self.write_expr(condition);
                self.out.push_str(": ");
                self.write_expr(then_body);
                for (cond, body) in elif_clauses {
                    self.out.push_str(" elif ");
                    self.write_expr(cond);
                    self.out.push_str(": ");
                    self.write_expr(body);
                }
                if let Some(body) = else_body {
                    self.out.push_str(" else: ");
                    self.write_expr(body);
                }
            }
            NodeKind::Match { value, arms } => {
                self.out.push_str("match ");
                self.write_expr(value);
                self.out.push(':');
                self.indent += 1;
                for arm in arms {
                    self.out.push('\n');
                    self.write_indent();
                    self.write_match_arm(arm);
                }
                self.indent -= 1;
                self.out.push('\n');
                self.write_indent();
                self.out.push_str("end");
            }
            NodeKind::Foreach {
                variable,
                iterable,
                body,
            } => {
                self.out.push_str("foreach (");
                self.out.push_str(&variable);
                self.out.push_str(", ");
                self.write_expr(iterable);
                self.out.push_str("):");
                self.write_body(&body);
            }
            NodeKind::While { condition, body } => {
                self.out.push_str("while ");
                self.write_expr(condition);
                self.out.push(':');
                self.write_body(&body);
            }
            NodeKind::Until { condition, body } => {
                self.out.push_str("until ");
                self.write_expr(condition);
                self.out.push(':');
                self.write_body(&body);
            }
            NodeKind::Loop { body } => {
                self.out.push_str("loop:");
                self.write_body(&body);
            }
            NodeKind::Break => self.out.push_str("break"),
            NodeKind::Continue => self.out.push_str("continue"),
            NodeKind::Block { body } => {
                self.out.push_str("do");
                self.write_body(&body);
            }
            _ => self.write_expr(id),
        }
    }

    fn write_definition(&mut self, keyword: &str, name: &str, params: &[Param], body: &DefBody) {
        self.out.push_str(keyword);
        self.out.push(' ');
        self.out.push_str(name);
        if !params.is_empty() {
            self.write_params(params);
        }
        self.out.push(':');
        match body {
            DefBody::Expr(expr) => {
                self.out.push(' ');
                self.write_expr(*expr);
                self.out.push(';');
            }
            DefBody::Block(stmts) => {
                self.write_body(stmts);
            }
        }
    }

    fn write_params(&mut self, params: &[Param]) {
        self.out.push('(');
        for (index, param) in params.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            if param.variadic {
                self.out.push_str("..");
            }
            self.out.push_str(&param.name);
            if let Some(default) = param.default {
                self.out.push_str(" = ");
                self.write_expr(default);
            }
        }
        self.out.push(')');
    }

    fn write_match_arm(&mut self, id: NodeId) {
        let NodeKind::MatchArm {
            pattern,
            guard,
            body,
        } = self.kind(id).clone()
        else {
            return;
        };
        self.out.push_str("| ");
        self.write_pattern(pattern);
        if let Some(guard) = guard {
            self.out.push_str(" if ");
            self.write_expr(guard);
        }
        self.out.push_str(": ");
        self.write_expr(body);
    }

    fn write_pattern(&mut self, id: NodeId) {
        match self.kind(id).clone() {
            NodeKind::LiteralPattern(literal) => self.write_literal(&literal),
            NodeKind::TypePattern(type_name) => {
                self.out.push(':');
                self.out.push_str(&type_name.to_string());
            }
            NodeKind::WildcardPattern => self.out.push('_'),
            NodeKind::VariablePattern { name } => self.out.push_str(&name),
            NodeKind::RestPattern { name } => {
                self.out.push_str("..");
                self.out.push_str(&name);
            }
            NodeKind::ArrayPattern { elements } => {
                self.out.push('[');
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_pattern(*element);
                }
                self.out.push(']');
            }
            NodeKind::DictPattern { keys } => {
                self.out.push('{');
                for (index, key) in keys.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(key);
                }
                self.out.push('}');
            }
            _ => {}
        }
    }

    fn write_expr(&mut self, id: NodeId) {
        match self.kind(id).clone() {
            NodeKind::Literal(literal) => self.write_literal(&literal),
            NodeKind::Identifier { name } => self.out.push_str(&name),
            NodeKind::SelfValue => self.out.push_str("self"),
            NodeKind::Nodes => self.out.push_str("nodes"),
            NodeKind::Pipe { stages } => {
                for (index, stage) in stages.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(" | ");
                    }
                    self.write_expr(*stage);
                }
            }
            NodeKind::Binary { op, left, right } => {
                self.write_expr(left);
                self.out.push(' ');
                self.out.push_str(&op.to_string());
                self.out.push(' ');
                self.write_expr(right);
            }
            NodeKind::Unary { op, operand } => {
                self.out.push_str(&op.to_string());
                self.write_expr(operand);
            }
            NodeKind::Assignment { op, target, value } => {
                self.write_expr(target);
                self.out.push(' ');
                self.out.push_str(&op.to_string());
                self.out.push(' ');
                self.write_expr(value);
            }
            NodeKind::QualifiedAccess {
                module,
                name,
                arguments,
            } => {
                self.out.push_str(&module);
                self.out.push_str("::");
                self.out.push_str(&name);
                if let Some(arguments) = arguments {
                    self.write_arguments(&arguments);
                }
            }
            NodeKind::Call { name, arguments } => {
                self.out.push_str(&name);
                self.write_arguments(&arguments);
            }
            NodeKind::Selector { base, suffixes } => {
                if let Some(base) = base {
                    self.write_expr(base);
                }
                for (index, suffix) in suffixes.iter().enumerate() {
                    let bracket_needs_dot = index == 0 && base.is_none();
                    self.write_selector_suffix(suffix, bracket_needs_dot);
                }
            }
            NodeKind::Array { elements } => {
                self.out.push('[');
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expr(*element);
                }
                self.out.push(']');
            }
            NodeKind::Dict { entries } => {
                self.out.push('{');
                for (index, entry) in entries.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expr(*entry);
                }
                self.out.push('}');
            }
            NodeKind::DictEntry { key, value } => {
                self.write_expr(key);
                self.out.push_str(": ");
                self.write_expr(value);
            }
            NodeKind::Group { inner } => {
                self.out.push('(');
                self.write_expr(inner);
                self.out.push(')');
            }
            NodeKind::FunctionLiteral { params, body } => {
                self.out.push_str("fn");
                if !params.is_empty() {
                    self.write_params(&params);
                }
                self.out.push_str(": ");
                self.write_expr(body);
                self.out.push(';');
            }
            NodeKind::InterpolatedString { parts } => {
                self.out.push_str("s\"");
                for part in parts {
                    match part {
                        StringPart::Text(text) => self.write_escaped_text(&text),
                        StringPart::Dollar => self.out.push_str("$$"),
                        StringPart::Expr(expr) => {
                            self.out.push_str("${");
                            self.write_expr(expr);
                            self.out.push('}');
                        }
                    }
                }
                self.out.push('"');
            }
            _ => self.write_stmt(id),
        }
    }

    fn write_arguments(&mut self, arguments: &[NodeId]) {
        self.out.push('(');
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            self.write_expr(*argument);
        }
        self.out.push(')');
    }

    fn write_selector_suffix(&mut self, suffix: &SelectorSuffix, bracket_needs_dot: bool) {
        match suffix {
            SelectorSuffix::Property(name) => {
                self.out.push('.');
                self.out.push_str(name);
            }
            SelectorSuffix::Index(index) => {
                if bracket_needs_dot {
                    self.out.push('.');
                }
                self.out.push('[');
                if let Some(index) = index {
                    self.write_expr(*index);
                }
                self.out.push(']');
            }
            SelectorSuffix::Slice(start, end) => {
                if bracket_needs_dot {
                    self.out.push('.');
                }
                self.out.push('[');
                self.write_expr(*start);
                self.out.push_str(": ");
                self.write_expr(*end);
                self.out.push(']');
            }
        }
    }

    fn write_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Number(value) => self.out.push_str(&format_number(*value)),
            Literal::String(value) => self.write_quoted(value),
            Literal::Bool(true) => self.out.push_str("true"),
            Literal::Bool(false) => self.out.push_str("false"),
            Literal::None => self.out.push_str("None"),
            Literal::Symbol(name) => {
                self.out.push(':');
                self.out.push_str(name);
            }
        }
    }

    fn write_quoted(&mut self, value: &str) {
        self.out.push('"');
        self.write_escaped_text(value);
        self.out.push('"');
    }

    fn write_escaped_text(&mut self, value: &str) {
        for ch in value.chars() {
            match ch {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                _ => self.out.push(ch),
            }
        }
    }
}

/// Numbers print without a trailing `.0` when they are whole; the source
/// grammar has no exponent form, so everything round-trips through the
/// plain decimal notation.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
