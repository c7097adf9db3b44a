use tracing::debug;

use crate::frontend::ast::{
    Block, DeclItem, Expression, ExpressionKind, FunctionItem, Program, Statement, StatementKind,
    TopDef, TopDefKind, Type,
};
use crate::frontend::error::{FrontendError, FrontendErrorKind};
use crate::meta::{GetLocation, LocationMeta, Meta};
use crate::util::env::Env;
use crate::util::visitor::AstVisitor;

use super::symbols::{Symbol, SymbolKind, SymbolTable};

pub type CheckResult = Result<(), Vec<FrontendError<LocationMeta>>>;

/// collect errors of all partial results, in order
fn merge(results: Vec<CheckResult>) -> CheckResult {
    let errors: Vec<_> = results.into_iter()
        .filter_map(Result::err)
        .flatten()
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn env_error(message: String, loc: LocationMeta) -> CheckResult {
    let kind = FrontendErrorKind::EnvError { message };
    Err(vec![FrontendError::new(kind, loc)])
}

/// resolves every name used in the program against lexically scoped declarations
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self { symbols: SymbolTable::new() }
    }

    /// function names are not bound by their definitions,
    /// only functions registered here can be called
    pub fn with_builtins(builtins: Env<Type>) -> Self {
        let globals = builtins.into_iter()
            .map(|(name, ret)| (name, Symbol::function(ret)))
            .collect();
        Self { symbols: SymbolTable::with_globals(globals) }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// analyze all top-level definitions, errors are accumulated in source order
    pub fn check_program(&mut self, program: &Program) -> CheckResult {
        let results: Vec<_> = program.defs.iter()
            .map(|def| self.visit_top_def(def))
            .collect();
        let result = merge(results);
        match &result {
            Ok(_) => debug!("semantic analysis found no issues"),
            Err(errors) => debug!("semantic analysis found {} issues", errors.len()),
        }
        result
    }

    /// bind the name first, initializer is analyzed with the name already visible
    fn declare(&mut self, decl: &DeclItem, loc: LocationMeta) -> CheckResult {
        let symbol = Meta::new(Symbol::variable(decl.t), loc);
        let declared = self.symbols.insert(decl.ident.clone(), symbol)
            .map_err(|e| vec![e]);
        let initialized = match &decl.init {
            Some(init) => self.visit_expression(init),
            None => Ok(()),
        };
        merge(vec![declared, initialized])
    }

    fn check_function(&mut self, func: &FunctionItem) -> CheckResult {
        self.symbols.enter_scope();
        let mut results: Vec<_> = func.args.iter()
            .map(|arg| {
                let symbol = Meta::new(Symbol::variable(arg.item.t), arg.get_location());
                self.symbols.insert(arg.item.ident.clone(), symbol)
                    .map_err(|e| vec![e])
            })
            .collect();
        if let Some(block) = &func.block {
            results.push(self.visit_block(block));
        }
        self.symbols.exit_scope();
        merge(results)
    }

    /// branches of conditionals and loop bodies get a scope of their own
    fn check_branch(&mut self, block: &Block) -> CheckResult {
        self.symbols.enter_scope();
        let result = self.visit_block(block);
        self.symbols.exit_scope();
        result
    }
}

impl AstVisitor<CheckResult> for SemanticAnalyzer {
    fn visit_expression(&mut self, expr: &Expression) -> CheckResult {
        match &expr.item {
            ExpressionKind::Literal { .. } => Ok(()),
            ExpressionKind::Identifier { ident } => {
                match self.symbols.lookup(ident) {
                    Some(_) => Ok(()),
                    None => env_error(format!("Undefined identifier '{}'", ident), expr.get_location()),
                }
            }
            ExpressionKind::Call { ident, args } => {
                let callee = match self.symbols.lookup(ident) {
                    Some(Symbol { kind: SymbolKind::Function, .. }) => Ok(()),
                    _ => env_error(format!("Call to undefined function '{}'", ident), expr.get_location()),
                };
                let mut results = vec![callee];
                for arg in args.iter() {
                    results.push(self.visit_expression(arg));
                }
                merge(results)
            }
            ExpressionKind::Unary { arg, .. } => self.visit_expression(arg),
            ExpressionKind::Binary { left, right, .. } => {
                let left = self.visit_expression(left);
                let right = self.visit_expression(right);
                merge(vec![left, right])
            }
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) -> CheckResult {
        match &stmt.item {
            StatementKind::Block { block } => self.visit_block(block),
            StatementKind::Decl { decl } => self.declare(decl, stmt.get_location()),
            StatementKind::Assign { ident, expr } => {
                let target = match self.symbols.lookup(ident) {
                    Some(_) => Ok(()),
                    None => env_error(
                        format!("Assignment to undefined variable '{}'", ident),
                        stmt.get_location(),
                    ),
                };
                let value = self.visit_expression(expr);
                merge(vec![target, value])
            }
            StatementKind::If { cond, then_block, else_block } => {
                let mut results = vec![
                    self.visit_expression(cond),
                    self.check_branch(then_block),
                ];
                if let Some(else_block) = else_block {
                    results.push(self.check_branch(else_block));
                }
                merge(results)
            }
            StatementKind::While { cond, body } => {
                let cond = self.visit_expression(cond);
                let body = self.check_branch(body);
                merge(vec![cond, body])
            }
            StatementKind::For { init, cond, step, body } => {
                self.symbols.enter_scope();
                let mut results = vec![];
                if let Some(init) = init {
                    results.push(self.visit_statement(init));
                }
                if let Some(cond) = cond {
                    results.push(self.visit_expression(cond));
                }
                if let Some(step) = step {
                    results.push(self.visit_expression(step));
                }
                results.push(self.visit_block(body));
                self.symbols.exit_scope();
                merge(results)
            }
            StatementKind::Return { expr } => match expr {
                Some(expr) => self.visit_expression(expr),
                None => Ok(()),
            },
            StatementKind::Break | StatementKind::Continue => Ok(()),
        }
    }

    fn visit_block(&mut self, block: &Block) -> CheckResult {
        self.symbols.enter_scope();
        let results: Vec<_> = block.item.stmts.iter()
            .map(|stmt| self.visit_statement(stmt))
            .collect();
        self.symbols.exit_scope();
        merge(results)
    }

    fn visit_top_def(&mut self, def: &TopDef) -> CheckResult {
        match &def.item {
            TopDefKind::Function { func } => self.check_function(func),
            TopDefKind::Decl { decl } => self.declare(decl, def.get_location()),
        }
    }
}
