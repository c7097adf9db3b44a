use crate::frontend::ast::{Block, Expression, Statement, TopDef};

pub trait AstVisitor<ResultT> {
    fn visit_expression(&mut self, expr: &Expression) -> ResultT;
    fn visit_statement(&mut self, stmt: &Statement) -> ResultT;
    fn visit_block(&mut self, block: &Block) -> ResultT;
    fn visit_top_def(&mut self, def: &TopDef) -> ResultT;
}
