use itertools::Itertools;
use tracing::debug;

use crate::frontend::ast::{
    Block, DeclItem, Expression, ExpressionKind, FunctionItem, Program, Statement, StatementKind,
    TopDef, TopDefKind,
};
use crate::util::visitor::AstVisitor;

const INDENT: &str = "  ";

/// re-emits normalized source code, every visit returns the generated text
pub struct CodeGenerator {
    indent_level: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self { indent_level: 0 }
    }

    pub fn generate(&mut self, program: &Program) -> String {
        self.indent_level = 0;
        program.defs.iter()
            .map(|def| self.visit_top_def(def))
            .collect()
    }

    /// single line at the current indentation
    fn line(&self, text: &str) -> String {
        format!("{}{}\n", INDENT.repeat(self.indent_level), text)
    }

    fn empty_block(&self) -> String {
        format!("{}{}", self.line("{"), self.line("}"))
    }

    /// declaration without the trailing semicolon
    fn declaration(&mut self, decl: &DeclItem) -> String {
        match &decl.init {
            Some(init) => {
                let init = self.visit_expression(init);
                format!("{} {} = {}", decl.t, decl.ident, init)
            }
            None => format!("{} {}", decl.t, decl.ident),
        }
    }

    fn function(&mut self, func: &FunctionItem) -> String {
        let params = func.args.iter()
            .map(|arg| format!("{} {}", arg.item.t, arg.item.ident))
            .join(", ");
        let mut code = self.line(&format!("{} {}({})", func.ret, func.ident, params));
        match &func.block {
            Some(block) => code.push_str(&self.visit_block(block)),
            None => code.push_str(&self.empty_block()),
        }
        code.push('\n');
        code
    }
}

impl AstVisitor<String> for CodeGenerator {
    fn visit_expression(&mut self, expr: &Expression) -> String {
        match &expr.item {
            ExpressionKind::Literal { val, .. } => val.clone(),
            ExpressionKind::Identifier { ident } => ident.clone(),
            ExpressionKind::Call { ident, args } => {
                let args = args.iter()
                    .map(|arg| self.visit_expression(arg))
                    .join(", ");
                format!("{}({})", ident, args)
            }
            ExpressionKind::Unary { op, arg } => {
                let arg = self.visit_expression(arg);
                format!("{}{}", op, arg)
            }
            ExpressionKind::Binary { left, op, right } => {
                let left = self.visit_expression(left);
                let right = self.visit_expression(right);
                format!("({} {} {})", left, op, right)
            }
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) -> String {
        match &stmt.item {
            StatementKind::Block { block } => self.visit_block(block),
            StatementKind::Decl { decl } => {
                let decl = self.declaration(decl);
                self.line(&format!("{};", decl))
            }
            StatementKind::Assign { ident, expr } => {
                let expr = self.visit_expression(expr);
                self.line(&format!("{} = {};", ident, expr))
            }
            StatementKind::If { cond, then_block, else_block } => {
                let cond = self.visit_expression(cond);
                let mut code = self.line(&format!("if ({})", cond));
                code.push_str(&self.visit_block(then_block));
                if let Some(else_block) = else_block {
                    code.push_str(&self.line("else"));
                    code.push_str(&self.visit_block(else_block));
                }
                code
            }
            StatementKind::While { cond, body } => {
                let cond = self.visit_expression(cond);
                let mut code = self.line(&format!("while ({})", cond));
                code.push_str(&self.visit_block(body));
                code
            }
            StatementKind::For { init, cond, step, body } => {
                // only a declaration can be re-derived as the init clause
                let init = match init.as_ref().map(|init| &init.item) {
                    Some(StatementKind::Decl { decl }) => format!("{};", self.declaration(decl)),
                    _ => String::from(";"),
                };
                let cond = match cond {
                    Some(cond) => self.visit_expression(cond),
                    None => String::new(),
                };
                let step = match step {
                    Some(step) => self.visit_expression(step),
                    None => String::new(),
                };
                let mut code = self.line(&format!("for ({} {}; {})", init, cond, step));
                code.push_str(&self.visit_block(body));
                code
            }
            StatementKind::Return { expr } => match expr {
                Some(expr) => {
                    let expr = self.visit_expression(expr);
                    self.line(&format!("return {};", expr))
                }
                None => self.line("return;"),
            },
            StatementKind::Break => self.line("break;"),
            StatementKind::Continue => self.line("continue;"),
        }
    }

    fn visit_block(&mut self, block: &Block) -> String {
        let mut code = self.line("{");
        self.indent_level += 1;
        for stmt in block.item.stmts.iter() {
            code.push_str(&self.visit_statement(stmt));
        }
        self.indent_level -= 1;
        code.push_str(&self.line("}"));
        code
    }

    fn visit_top_def(&mut self, def: &TopDef) -> String {
        match &def.item {
            TopDefKind::Function { func } => self.function(func),
            TopDefKind::Decl { decl } => {
                let decl = self.declaration(decl);
                self.line(&format!("{};", decl))
            }
        }
    }
}

/// generate normalized source code of the whole program
pub fn generate_code(program: &Program) -> String {
    let code = CodeGenerator::new().generate(program);
    debug!("generated {} lines of code", code.lines().count());
    code
}

#[cfg(test)]
mod tests {
    use crate::frontend::ast::{BlockItem, LiteralKind, Type};
    use crate::frontend::{parse_expression, parse_program, SourceMap};
    use crate::meta::LocationMeta;

    use super::*;

    fn parse(code: &str) -> Program {
        parse_program(&SourceMap::new(String::from("test.c"), String::from(code))).unwrap()
    }

    fn expression(code: &str) -> String {
        let expr = parse_expression(&SourceMap::new(String::from("expr"), String::from(code))).unwrap();
        CodeGenerator::new().visit_expression(&expr)
    }

    #[test]
    fn binary_operations_are_fully_parenthesized() {
        assert_eq!(expression("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(expression("a - b - c"), "((a - b) - c)");
        assert_eq!(expression("a = b = 1"), "(a = (b = 1))");
    }

    #[test]
    fn unary_operators_are_prefixed_without_space() {
        assert_eq!(expression("- -x"), "--x");
        assert_eq!(expression("!(a && b)"), "!(a && b)");
    }

    #[test]
    fn calls_list_arguments() {
        assert_eq!(expression("f()"), "f()");
        assert_eq!(expression("max(a, b + 1)"), "max(a, (b + 1))");
    }

    #[test]
    fn function_is_followed_by_blank_line() {
        let code = generate_code(&parse("int add(int a, int b) { return a + b; }\nint g = 007;"));
        assert_eq!(code, "int add(int a, int b)\n{\n  return (a + b);\n}\n\nint g = 7;\n");
    }

    #[test]
    fn control_flow_is_normalized() {
        let source = "void f(int n) {\n\
                      if (n > 0) n = n - 1; else { return; }\n\
                      while (n) { continue; }\n\
                      for (i = 0; i < n; i = i + 1) break;\n\
                      }\n";
        let expected = "void f(int n)\n\
                        {\n\
                        \x20 if ((n > 0))\n\
                        \x20 {\n\
                        \x20   n = (n - 1);\n\
                        \x20 }\n\
                        \x20 else\n\
                        \x20 {\n\
                        \x20   return;\n\
                        \x20 }\n\
                        \x20 while (n)\n\
                        \x20 {\n\
                        \x20   continue;\n\
                        \x20 }\n\
                        \x20 for (; (i < n); (i = (i + 1)))\n\
                        \x20 {\n\
                        \x20   break;\n\
                        \x20 }\n\
                        }\n\n";
        assert_eq!(generate_code(&parse(source)), expected);
    }

    #[test]
    fn declaration_init_is_rendered_in_for_header() {
        let loc = LocationMeta::from(1);
        let init = Statement::new(
            StatementKind::Decl {
                decl: DeclItem {
                    t: Type::Int,
                    ident: String::from("i"),
                    init: Some(Expression::literal(String::from("0"), LiteralKind::Int, loc)),
                },
            },
            loc,
        );
        let stmt = Statement::new(
            StatementKind::For {
                init: Some(Box::new(init)),
                cond: None,
                step: None,
                body: Block::new(BlockItem::default(), loc),
            },
            loc,
        );
        assert_eq!(CodeGenerator::new().visit_statement(&stmt), "for (int i = 0; ; )\n{\n}\n");
    }

    #[test]
    fn missing_function_body_is_an_empty_block() {
        let loc = LocationMeta::from(1);
        let func = FunctionItem { ret: Type::Void, ident: String::from("f"), args: vec![], block: None };
        let program = Program::new(vec![TopDef::new(TopDefKind::Function { func }, loc)]);
        assert_eq!(generate_code(&program), "void f()\n{\n}\n\n");
    }

    #[test]
    fn generated_code_is_stable() {
        let source = "int g;\nint main(int argc) {\n  int x = 1;\n  if (x) if (argc) x = 2; else { x = -x; }\n  \
                      for (;;) { while (!x) break; }\n  return f(x, 'c', \"s\", 1.5e3);\n}\n";
        let first = generate_code(&parse(source));
        let second = generate_code(&parse(&first));
        assert_eq!(first, second);
    }
}
