use std::fmt;

use crate::meta::{LocationMeta, Meta};

/// trait for marking ast items that carry a node kind tag
pub trait Tagged {
    fn kind(&self) -> NodeKind;
}

/// alias for all metadata containers attached to ast items
pub type AstItem<ItemT> = Meta<ItemT, LocationMeta>;

impl<ItemT: Tagged> Tagged for AstItem<ItemT> {
    /// if item is tagged, the whole wrapper has the same tag
    fn kind(&self) -> NodeKind {
        self.item.kind()
    }
}

/// kind tag of every node in the tree
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NodeKind {
    BinaryOp,
    UnaryOp,
    Literal,
    Identifier,
    If,
    While,
    For,
    Function,
    Call,
    VarDecl,
    Assign,
    Block,
    Return,
    Break,
    Continue,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::BinaryOp => "BinaryOp",
            NodeKind::UnaryOp => "UnaryOp",
            NodeKind::Literal => "Literal",
            NodeKind::Identifier => "Identifier",
            NodeKind::If => "If",
            NodeKind::While => "While",
            NodeKind::For => "For",
            NodeKind::Function => "Function",
            NodeKind::Call => "Call",
            NodeKind::VarDecl => "VarDecl",
            NodeKind::Assign => "Assign",
            NodeKind::Block => "Block",
            NodeKind::Return => "Return",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Type {
    Int,
    Char,
    Float,
    Double,
    Void,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Char => "char",
            Type::Float => "float",
            Type::Double => "double",
            Type::Void => "void",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    /// assignment used as an expression (`a = b = c`)
    Assign,
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Assign => "=",
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Times => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Not,
    Neg,
    Plus,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Neg => "-",
            UnaryOperator::Plus => "+",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LiteralKind {
    Int,
    Float,
    Str,
    Char,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LiteralKind::Int => "int",
            LiteralKind::Float => "float",
            LiteralKind::Str => "string",
            LiteralKind::Char => "char",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind {
    /// value is kept as written in the source (quotes included for strings and chars)
    Literal { val: String, kind: LiteralKind },
    Identifier { ident: String },
    Call { ident: String, args: Vec<Box<Expression>> },
    Unary { op: UnaryOperator, arg: Box<Expression> },
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
}

pub type Expression = AstItem<ExpressionKind>;

impl Tagged for ExpressionKind {
    fn kind(&self) -> NodeKind {
        match self {
            ExpressionKind::Literal { .. } => NodeKind::Literal,
            ExpressionKind::Identifier { .. } => NodeKind::Identifier,
            ExpressionKind::Call { .. } => NodeKind::Call,
            ExpressionKind::Unary { .. } => NodeKind::UnaryOp,
            ExpressionKind::Binary { .. } => NodeKind::BinaryOp,
        }
    }
}

impl Expression {
    pub fn literal(val: String, kind: LiteralKind, loc: LocationMeta) -> Box<Self> {
        Box::new(Self::new(ExpressionKind::Literal { val, kind }, loc))
    }

    pub fn identifier(ident: String, loc: LocationMeta) -> Box<Self> {
        Box::new(Self::new(ExpressionKind::Identifier { ident }, loc))
    }

    pub fn unary(op: UnaryOperator, arg: Box<Expression>, loc: LocationMeta) -> Box<Self> {
        Box::new(Self::new(ExpressionKind::Unary { op, arg }, loc))
    }

    pub fn binary(
        left: Box<Expression>, op: BinaryOperator, right: Box<Expression>, loc: LocationMeta,
    ) -> Box<Self> {
        Box::new(Self::new(ExpressionKind::Binary { left, op, right }, loc))
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct BlockItem {
    pub stmts: Vec<Box<Statement>>,
}

pub type Block = AstItem<BlockItem>;

impl Tagged for BlockItem {
    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }
}

impl BlockItem {
    /// expression statements are parsed as None and do not become a part of the block
    pub fn new(stmts: Vec<Option<Statement>>) -> Self {
        let stmts = stmts.into_iter()
            .flatten()
            .map(Box::new)
            .collect();
        Self { stmts }
    }
}

impl Block {
    /// body of a control statement: blocks are used as they are,
    /// any other statement is wrapped in a block located at the control statement
    pub fn from_dependent(stmt: Option<Statement>, loc: LocationMeta) -> Self {
        match stmt {
            Some(stmt) => {
                let stmt_loc = *stmt.get_meta();
                match stmt.item {
                    StatementKind::Block { block } => block,
                    item => {
                        let stmts = vec![Box::new(Statement::new(item, stmt_loc))];
                        Block::new(BlockItem { stmts }, loc)
                    }
                }
            }
            None => Block::new(BlockItem::default(), loc),
        }
    }
}

/// variable declaration, both global and local
#[derive(Debug, PartialEq, Clone)]
pub struct DeclItem {
    pub t: Type,
    pub ident: String,
    pub init: Option<Box<Expression>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StatementKind {
    Block { block: Block },
    Decl { decl: DeclItem },
    Assign { ident: String, expr: Box<Expression> },
    If {
        cond: Box<Expression>,
        then_block: Block,
        else_block: Option<Block>,
    },
    While { cond: Box<Expression>, body: Block },
    // edge case: the init clause of a for loop is parsed as an expression and dropped,
    // so the parser never sets init
    For {
        init: Option<Box<Statement>>,
        cond: Option<Box<Expression>>,
        step: Option<Box<Expression>>,
        body: Block,
    },
    Return { expr: Option<Box<Expression>> },
    Break,
    Continue,
}

pub type Statement = AstItem<StatementKind>;

impl Tagged for StatementKind {
    fn kind(&self) -> NodeKind {
        match self {
            StatementKind::Block { .. } => NodeKind::Block,
            StatementKind::Decl { .. } => NodeKind::VarDecl,
            StatementKind::Assign { .. } => NodeKind::Assign,
            StatementKind::If { .. } => NodeKind::If,
            StatementKind::While { .. } => NodeKind::While,
            StatementKind::For { .. } => NodeKind::For,
            StatementKind::Return { .. } => NodeKind::Return,
            StatementKind::Break => NodeKind::Break,
            StatementKind::Continue => NodeKind::Continue,
        }
    }
}

impl Statement {
    /// expression statements are discarded, except for a plain `ident = expr` assignment
    pub fn from_expression(expr: Box<Expression>, loc: LocationMeta) -> Option<Self> {
        let expr = *expr;
        match expr.item {
            ExpressionKind::Binary { left, op: BinaryOperator::Assign, right } => {
                match left.item {
                    ExpressionKind::Identifier { ident } => {
                        Some(Self::new(StatementKind::Assign { ident, expr: right }, loc))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn block(block: Block) -> Self {
        let loc = *block.get_meta();
        Self::new(StatementKind::Block { block }, loc)
    }

    pub fn if_then(cond: Box<Expression>, then_stmt: Option<Statement>, loc: LocationMeta) -> Option<Self> {
        let kind = StatementKind::If {
            cond,
            then_block: Block::from_dependent(then_stmt, loc),
            else_block: None,
        };
        Some(Self::new(kind, loc))
    }

    pub fn if_then_else(
        cond: Box<Expression>, then_stmt: Option<Statement>, else_stmt: Option<Statement>, loc: LocationMeta,
    ) -> Option<Self> {
        let kind = StatementKind::If {
            cond,
            then_block: Block::from_dependent(then_stmt, loc),
            else_block: Some(Block::from_dependent(else_stmt, loc)),
        };
        Some(Self::new(kind, loc))
    }

    pub fn while_loop(cond: Box<Expression>, body: Option<Statement>, loc: LocationMeta) -> Option<Self> {
        let kind = StatementKind::While { cond, body: Block::from_dependent(body, loc) };
        Some(Self::new(kind, loc))
    }

    pub fn for_loop(
        cond: Option<Box<Expression>>, step: Option<Box<Expression>>, body: Option<Statement>, loc: LocationMeta,
    ) -> Option<Self> {
        let kind = StatementKind::For {
            init: None,
            cond,
            step,
            body: Block::from_dependent(body, loc),
        };
        Some(Self::new(kind, loc))
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ArgItem {
    pub t: Type,
    pub ident: String,
}

pub type Arg = AstItem<ArgItem>;

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionItem {
    pub ret: Type,
    pub ident: String,
    pub args: Vec<Arg>,
    /// always present in parsed programs
    pub block: Option<Block>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TopDefKind {
    Function { func: FunctionItem },
    Decl { decl: DeclItem },
}

pub type TopDef = AstItem<TopDefKind>;

impl Tagged for TopDefKind {
    fn kind(&self) -> NodeKind {
        match self {
            TopDefKind::Function { .. } => NodeKind::Function,
            TopDefKind::Decl { .. } => NodeKind::VarDecl,
        }
    }
}

/// the result of parsing and all subsequent operations (ast root),
/// definitions are kept in source order
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub defs: Vec<TopDef>,
}

impl Program {
    pub fn new(defs: Vec<TopDef>) -> Self {
        Self { defs }
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
