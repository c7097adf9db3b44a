use serde::Serialize;
use tracing::debug;

use crate::frontend::ast::{
    Block, DeclItem, Expression, ExpressionKind, FunctionItem, Program, Statement, StatementKind,
    TopDef, TopDefKind,
};
use crate::meta::GetLocation;

/// json view of a single node, the kind name is emitted first as `type` and the line last
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum Node<'a> {
    BinaryOp {
        operator: String,
        left: Box<Node<'a>>,
        right: Box<Node<'a>>,
        line: usize,
    },
    UnaryOp {
        operator: String,
        operand: Box<Node<'a>>,
        line: usize,
    },
    Literal {
        value: &'a str,
        #[serde(rename = "literalType")]
        literal_type: String,
        line: usize,
    },
    Identifier {
        name: &'a str,
        line: usize,
    },
    Call {
        name: &'a str,
        args: Vec<Node<'a>>,
        line: usize,
    },
    VarDecl {
        #[serde(rename = "varType")]
        var_type: String,
        name: &'a str,
        initializer: Option<Box<Node<'a>>>,
        line: usize,
    },
    Assign {
        name: &'a str,
        value: Box<Node<'a>>,
        line: usize,
    },
    If {
        condition: Box<Node<'a>>,
        #[serde(rename = "thenBlock")]
        then_block: Box<Node<'a>>,
        #[serde(rename = "elseBlock")]
        else_block: Option<Box<Node<'a>>>,
        line: usize,
    },
    While {
        condition: Box<Node<'a>>,
        body: Box<Node<'a>>,
        line: usize,
    },
    For {
        init: Option<Box<Node<'a>>>,
        condition: Option<Box<Node<'a>>>,
        increment: Option<Box<Node<'a>>>,
        body: Box<Node<'a>>,
        line: usize,
    },
    Function {
        name: &'a str,
        #[serde(rename = "returnType")]
        return_type: String,
        params: Vec<Param<'a>>,
        body: Option<Box<Node<'a>>>,
        line: usize,
    },
    Block {
        statements: Vec<Node<'a>>,
        line: usize,
    },
    Return {
        value: Option<Box<Node<'a>>>,
        line: usize,
    },
    Break {
        line: usize,
    },
    Continue {
        line: usize,
    },
}

#[derive(Debug, Serialize)]
struct Param<'a> {
    #[serde(rename = "type")]
    t: String,
    name: &'a str,
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expr: &'a Expression) -> Self {
        let line = expr.get_line();
        match &expr.item {
            ExpressionKind::Literal { val, kind } => Node::Literal {
                value: val,
                literal_type: kind.to_string(),
                line,
            },
            ExpressionKind::Identifier { ident } => Node::Identifier { name: ident, line },
            ExpressionKind::Call { ident, args } => Node::Call {
                name: ident,
                args: args.iter().map(Node::from).collect(),
                line,
            },
            ExpressionKind::Unary { op, arg } => Node::UnaryOp {
                operator: op.to_string(),
                operand: boxed(arg),
                line,
            },
            ExpressionKind::Binary { left, op, right } => Node::BinaryOp {
                operator: op.to_string(),
                left: boxed(left),
                right: boxed(right),
                line,
            },
        }
    }
}

impl<'a> From<&'a Block> for Node<'a> {
    fn from(block: &'a Block) -> Self {
        Node::Block {
            statements: block.item.stmts.iter()
                .map(Node::from)
                .collect(),
            line: block.get_line(),
        }
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(stmt: &'a Statement) -> Self {
        let line = stmt.get_line();
        match &stmt.item {
            StatementKind::Block { block } => Node::from(block),
            StatementKind::Decl { decl } => declaration(decl, line),
            StatementKind::Assign { ident, expr } => Node::Assign {
                name: ident,
                value: boxed(expr),
                line,
            },
            StatementKind::If { cond, then_block, else_block } => Node::If {
                condition: boxed(cond),
                then_block: boxed(then_block),
                else_block: else_block.as_ref().map(boxed),
                line,
            },
            StatementKind::While { cond, body } => Node::While {
                condition: boxed(cond),
                body: boxed(body),
                line,
            },
            StatementKind::For { init, cond, step, body } => Node::For {
                init: init.as_deref().map(boxed),
                condition: cond.as_deref().map(boxed),
                increment: step.as_deref().map(boxed),
                body: boxed(body),
                line,
            },
            StatementKind::Return { expr } => Node::Return {
                value: expr.as_deref().map(boxed),
                line,
            },
            StatementKind::Break => Node::Break { line },
            StatementKind::Continue => Node::Continue { line },
        }
    }
}

impl<'a> From<&'a TopDef> for Node<'a> {
    fn from(def: &'a TopDef) -> Self {
        let line = def.get_line();
        match &def.item {
            TopDefKind::Function { func } => function(func, line),
            TopDefKind::Decl { decl } => declaration(decl, line),
        }
    }
}

impl<'a> From<&'a Box<Expression>> for Node<'a> {
    fn from(expr: &'a Box<Expression>) -> Self {
        Node::from(&**expr)
    }
}

impl<'a> From<&'a Box<Statement>> for Node<'a> {
    fn from(stmt: &'a Box<Statement>) -> Self {
        Node::from(&**stmt)
    }
}

fn boxed<'a, T>(item: &'a T) -> Box<Node<'a>> where Node<'a>: From<&'a T> {
    Box::new(Node::from(item))
}

fn declaration(decl: &DeclItem, line: usize) -> Node<'_> {
    Node::VarDecl {
        var_type: decl.t.to_string(),
        name: &decl.ident,
        initializer: decl.init.as_deref().map(boxed),
        line,
    }
}

fn function(func: &FunctionItem, line: usize) -> Node<'_> {
    Node::Function {
        name: &func.ident,
        return_type: func.ret.to_string(),
        params: func.args.iter()
            .map(|arg| Param { t: arg.item.t.to_string(), name: &arg.item.ident })
            .collect(),
        body: func.block.as_ref().map(boxed),
        line,
    }
}

/// pretty-printed json array with one element per top-level definition, followed by a newline
pub fn export_json(program: &Program) -> Result<String, serde_json::Error> {
    let nodes: Vec<_> = program.defs.iter()
        .map(Node::from)
        .collect();
    let mut json = serde_json::to_string_pretty(&nodes)?;
    json.push('\n');
    debug!("exported {} top-level definitions as json", nodes.len());
    Ok(json)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::frontend::{parse_program, SourceMap};

    use super::*;

    fn export(code: &str) -> String {
        let program = parse_program(&SourceMap::new(String::from("test.c"), String::from(code))).unwrap();
        export_json(&program).unwrap()
    }

    #[test]
    fn main_returning_zero_has_expected_shape() {
        let exported = export("int main() {\n  return 0;\n}\n");
        let value: Value = serde_json::from_str(&exported).unwrap();
        let expected = json!([
            {
                "type": "Function",
                "name": "main",
                "returnType": "int",
                "params": [],
                "body": {
                    "type": "Block",
                    "statements": [
                        {
                            "type": "Return",
                            "value": {
                                "type": "Literal",
                                "value": "0",
                                "literalType": "int",
                                "line": 2
                            },
                            "line": 2
                        }
                    ],
                    "line": 1
                },
                "line": 1
            }
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn fields_keep_declared_order() {
        let exported = export("float x = y;");
        let expected = r#"[
  {
    "type": "VarDecl",
    "varType": "float",
    "name": "x",
    "initializer": {
      "type": "Identifier",
      "name": "y",
      "line": 1
    },
    "line": 1
  }
]
"#;
        assert_eq!(exported, expected);
    }

    #[test]
    fn absent_children_are_null() {
        let exported = export("void f(int a, char b) {\n  if (a) return; \n  for (;;) break;\n}\n");
        let value: Value = serde_json::from_str(&exported).unwrap();
        let function = &value[0];
        assert_eq!(function["params"], json!([{"type": "int", "name": "a"}, {"type": "char", "name": "b"}]));
        let statements = &function["body"]["statements"];
        assert_eq!(statements[0]["type"], "If");
        assert_eq!(statements[0]["elseBlock"], Value::Null);
        assert_eq!(statements[0]["thenBlock"]["statements"][0]["value"], Value::Null);
        assert_eq!(statements[1]["type"], "For");
        assert_eq!(statements[1]["init"], Value::Null);
        assert_eq!(statements[1]["condition"], Value::Null);
        assert_eq!(statements[1]["increment"], Value::Null);
        assert_eq!(statements[1]["line"], 3);
    }

    #[test]
    fn nested_children_are_exported() {
        let exported = export("int main() {\n  while (x) {\n    y = f(-a, b * 2);\n  }\n}\n");
        let value: Value = serde_json::from_str(&exported).unwrap();
        let assign = &value[0]["body"]["statements"][0]["body"]["statements"][0];
        assert_eq!(assign["type"], "Assign");
        assert_eq!(assign["line"], 3);
        let args = &assign["value"]["args"];
        assert_eq!(args[0]["type"], "UnaryOp");
        assert_eq!(args[0]["operand"]["name"], "a");
        assert_eq!(args[1]["type"], "BinaryOp");
        assert_eq!(args[1]["right"]["value"], "2");
    }

    #[test]
    fn empty_program_is_an_empty_array() {
        assert_eq!(export(""), "[]\n");
    }
}
