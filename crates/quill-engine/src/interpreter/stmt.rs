//! Statement execution and declaration instantiation
//!
//! Declarations are instantiated when a scope is entered: `var` names are
//! collected from the whole body (without entering nested functions) and
//! bound in the nearest var scope; `let`/`const` names are bound
//! uninitialized in the block that declares them; function declarations
//! are created and bound at the top of their block.

use crate::interpreter::closure::Closure;
use crate::interpreter::environment::{self, BindingKind, EnvRef, Environment, ScopeKind};
use crate::interpreter::error::{EvalResult, RuntimeError};
use crate::interpreter::object::{self, ObjectRef};
use crate::interpreter::value::Value;
use crate::interpreter::{Completion, Interpreter};
use crate::parser::ast::*;
use crate::parser::interner::Symbol;

/// What a loop does after one run of its body.
enum Iteration {
    Next,
    Exit(Completion),
}

impl Interpreter {
    /// Run statements in order, stopping at the first abrupt completion.
    pub(crate) fn exec_statements(&mut self, statements: &[Statement], env: &EnvRef) -> EvalResult<Completion> {
        let mut last = None;
        for statement in statements {
            match self.exec_statement(statement, env)? {
                Completion::Normal(Some(value)) => last = Some(value),
                Completion::Normal(None) => {}
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal(last))
    }

    pub(crate) fn exec_statement(&mut self, statement: &Statement, env: &EnvRef) -> EvalResult<Completion> {
        self.exec_labeled(statement, env, &[])
    }

    /// Execute a statement carrying the labels written directly in front of it.
    fn exec_labeled(&mut self, statement: &Statement, env: &EnvRef, labels: &[Symbol]) -> EvalResult<Completion> {
        match statement {
            Statement::VariableDecl(decl) => {
                self.exec_variable_decl(decl, env)?;
                Ok(Completion::Normal(None))
            }
            // Bound when the enclosing block was entered
            Statement::FunctionDecl(_) => Ok(Completion::Normal(None)),
            Statement::Expression(stmt) => {
                let value = self.eval_expression(&stmt.expression, env)?;
                Ok(Completion::Normal(Some(value)))
            }
            Statement::Block(block) => self.exec_block(block, env),
            Statement::If(stmt) => {
                if self.eval_expression(&stmt.test, env)?.to_boolean() {
                    self.exec_statement(&stmt.consequent, env)
                } else if let Some(alternate) = &stmt.alternate {
                    self.exec_statement(alternate, env)
                } else {
                    Ok(Completion::Normal(None))
                }
            }
            Statement::While(stmt) => self.exec_while(stmt, env, labels),
            Statement::DoWhile(stmt) => self.exec_do_while(stmt, env, labels),
            Statement::For(stmt) => self.exec_for(stmt, env, labels),
            Statement::ForIn(stmt) => self.exec_for_in(stmt, env, labels),
            Statement::Break(stmt) => Ok(Completion::Break(stmt.label.map(|label| label.name))),
            Statement::Continue(stmt) => Ok(Completion::Continue(stmt.label.map(|label| label.name))),
            Statement::Return(stmt) => {
                let value = match &stmt.value {
                    Some(expr) => self.eval_expression(expr, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Statement::Throw(stmt) => {
                let value = self.eval_expression(&stmt.value, env)?;
                Err(self.throw(value))
            }
            Statement::Try(stmt) => self.exec_try(stmt, env),
            Statement::With(stmt) => self.exec_with(stmt, env),
            Statement::Labeled(stmt) => {
                let mut label_set = labels.to_vec();
                label_set.push(stmt.label.name);
                match self.exec_labeled(&stmt.body, env, &label_set)? {
                    Completion::Break(Some(label)) if label == stmt.label.name => Ok(Completion::Normal(None)),
                    other => Ok(other),
                }
            }
            Statement::Debugger(_) | Statement::Empty(_) => Ok(Completion::Normal(None)),
        }
    }

    pub(crate) fn exec_variable_decl(&mut self, decl: &VariableDecl, env: &EnvRef) -> EvalResult<()> {
        for declarator in &decl.declarations {
            let name = declarator.id.name;
            match decl.kind {
                VariableKind::Var => {
                    // `var x;` leaves an existing value alone
                    if let Some(init) = &declarator.init {
                        let value = self.eval_named(init, env, name)?;
                        self.assign_identifier(name, value, env)?;
                    }
                }
                VariableKind::Let | VariableKind::Const => {
                    let value = match &declarator.init {
                        Some(init) => self.eval_named(init, env, name)?,
                        None => Value::Undefined,
                    };
                    env.borrow_mut().initialize(name, value);
                }
            }
        }
        Ok(())
    }

    fn exec_block(&mut self, block: &BlockStatement, env: &EnvRef) -> EvalResult<Completion> {
        if !has_lexical_declarations(&block.statements) {
            return self.exec_statements(&block.statements, env);
        }
        let scope = Environment::new_frame(env, ScopeKind::Block);
        self.instantiate_block(&block.statements, &scope)?;
        self.exec_statements(&block.statements, &scope)
    }

    fn exec_while(&mut self, stmt: &WhileStatement, env: &EnvRef, labels: &[Symbol]) -> EvalResult<Completion> {
        let mut last = None;
        while self.eval_expression(&stmt.test, env)?.to_boolean() {
            let completion = self.exec_statement(&stmt.body, env)?;
            if let Iteration::Exit(completion) = after_iteration(completion, labels, &mut last) {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal(last))
    }

    fn exec_do_while(&mut self, stmt: &DoWhileStatement, env: &EnvRef, labels: &[Symbol]) -> EvalResult<Completion> {
        let mut last = None;
        loop {
            let completion = self.exec_statement(&stmt.body, env)?;
            if let Iteration::Exit(completion) = after_iteration(completion, labels, &mut last) {
                return Ok(completion);
            }
            if !self.eval_expression(&stmt.test, env)?.to_boolean() {
                return Ok(Completion::Normal(last));
            }
        }
    }

    fn exec_for(&mut self, stmt: &ForStatement, env: &EnvRef, labels: &[Symbol]) -> EvalResult<Completion> {
        // Names of `let`/`const` loop variables, copied into a fresh frame
        // per iteration so closures capture each iteration's value
        let mut per_iteration = Vec::new();

        let mut iteration_env = match &stmt.init {
            Some(ForInit::VariableDecl(decl)) if decl.kind != VariableKind::Var => {
                let loop_env = Environment::new_frame(env, ScopeKind::Block);
                for declarator in &decl.declarations {
                    let kind = BindingKind::from(decl.kind);
                    loop_env
                        .borrow_mut()
                        .declare(declarator.id.name, kind)
                        .map_err(|err| self.binding_error(err))?;
                    per_iteration.push((declarator.id.name, kind));
                }
                self.exec_variable_decl(decl, &loop_env)?;
                loop_env
            }
            Some(ForInit::VariableDecl(decl)) => {
                self.exec_variable_decl(decl, env)?;
                env.clone()
            }
            Some(ForInit::Expression(expr)) => {
                self.eval_expression(expr, env)?;
                env.clone()
            }
            None => env.clone(),
        };

        let mut last = None;
        loop {
            if let Some(test) = &stmt.test {
                if !self.eval_expression(test, &iteration_env)?.to_boolean() {
                    return Ok(Completion::Normal(last));
                }
            }

            let completion = self.exec_statement(&stmt.body, &iteration_env)?;
            if let Iteration::Exit(completion) = after_iteration(completion, labels, &mut last) {
                return Ok(completion);
            }

            if !per_iteration.is_empty() {
                iteration_env = self.copy_iteration_env(&iteration_env, env, &per_iteration)?;
            }
            if let Some(update) = &stmt.update {
                self.eval_expression(update, &iteration_env)?;
            }
        }
    }

    fn copy_iteration_env(
        &mut self,
        previous: &EnvRef,
        parent: &EnvRef,
        names: &[(Symbol, BindingKind)],
    ) -> EvalResult<EnvRef> {
        let next = Environment::new_frame(parent, ScopeKind::Block);
        for &(name, kind) in names {
            let value = environment::resolve(previous, name)
                .map_err(|err| self.binding_error(err))?
                .value;
            next.borrow_mut()
                .define(name, kind, value)
                .map_err(|err| self.binding_error(err))?;
        }
        Ok(next)
    }

    fn exec_for_in(&mut self, stmt: &ForInStatement, env: &EnvRef, labels: &[Symbol]) -> EvalResult<Completion> {
        let subject = self.eval_expression(&stmt.object, env)?;
        let keys: Vec<Value> = match &subject {
            Value::Object(obj) => object::enumerable_keys(obj)
                .into_iter()
                .map(|key| Value::String(key.to_text(&self.interner)))
                .collect(),
            Value::String(s) => (0..s.chars().count()).map(|i| Value::string(i.to_string())).collect(),
            _ => Vec::new(),
        };

        let mut last = None;
        for key in keys {
            let iteration_env = match &stmt.target {
                ForInTarget::Declaration(VariableKind::Var, id) => {
                    self.assign_identifier(id.name, key, env)?;
                    env.clone()
                }
                ForInTarget::Declaration(kind, id) => {
                    let scope = Environment::new_frame(env, ScopeKind::Block);
                    scope
                        .borrow_mut()
                        .define(id.name, BindingKind::from(*kind), key)
                        .map_err(|err| self.binding_error(err))?;
                    scope
                }
                ForInTarget::Expression(target) => {
                    let reference = self.eval_reference(target, env)?;
                    self.put_reference(&reference, key, env)?;
                    env.clone()
                }
            };

            let completion = self.exec_statement(&stmt.body, &iteration_env)?;
            if let Iteration::Exit(completion) = after_iteration(completion, labels, &mut last) {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal(last))
    }

    fn exec_try(&mut self, stmt: &TryStatement, env: &EnvRef) -> EvalResult<Completion> {
        let result = match (self.exec_block(&stmt.block, env), &stmt.handler) {
            (Err(err), Some(catch)) => self.exec_catch(catch, err, env),
            (result, _) => result,
        };

        if let Some(finally) = &stmt.finalizer {
            // An abrupt `finally` overrides whatever the try/catch produced
            let completion = self.exec_block(finally, env)?;
            if completion.is_abrupt() {
                return Ok(completion);
            }
        }

        result
    }

    fn exec_catch(&mut self, catch: &CatchClause, err: RuntimeError, env: &EnvRef) -> EvalResult<Completion> {
        let value = self.error_value(err);
        let scope = Environment::new_frame(env, ScopeKind::Block);
        if let Some(param) = &catch.param {
            scope
                .borrow_mut()
                .define(param.name, BindingKind::Let, value)
                .map_err(|err| self.binding_error(err))?;
        }
        self.exec_block(&catch.body, &scope)
    }

    fn exec_with(&mut self, stmt: &WithStatement, env: &EnvRef) -> EvalResult<Completion> {
        let subject = self.eval_expression(&stmt.object, env)?;
        let object: ObjectRef = match subject {
            Value::Object(object) => object,
            Value::Undefined | Value::Null => {
                return Err(RuntimeError::type_error(format!(
                    "cannot convert {} to object",
                    self.render(&subject)
                )))
            }
            // No wrapper objects; a primitive contributes no names
            _ => self.new_object(),
        };
        let scope = Environment::new_with(env, object);
        self.exec_statement(&stmt.body, &scope)
    }

    /// Bind every `var` name in a function, script or eval body.
    pub(crate) fn instantiate_var_scope(&mut self, statements: &[Statement], env: &EnvRef) -> EvalResult<()> {
        let mut names = Vec::new();
        collect_var_names(statements, &mut names);

        let mut frame = env.borrow_mut();
        for name in names {
            frame
                .declare(name, BindingKind::Var)
                .map_err(|err| self.binding_error(err))?;
        }
        Ok(())
    }

    /// Bind the lexical declarations and functions written directly in a block.
    pub(crate) fn instantiate_block(&mut self, statements: &[Statement], env: &EnvRef) -> EvalResult<()> {
        for statement in statements {
            match statement {
                Statement::VariableDecl(decl) if decl.kind != VariableKind::Var => {
                    let kind = BindingKind::from(decl.kind);
                    for declarator in &decl.declarations {
                        env.borrow_mut()
                            .declare(declarator.id.name, kind)
                            .map_err(|err| self.binding_error(err))?;
                    }
                }
                Statement::FunctionDecl(decl) => {
                    let closure = Closure::from_function(&decl.function, env, Some(decl.name.name));
                    let function = self.make_function(closure);
                    env.borrow_mut()
                        .define(decl.name.name, BindingKind::Var, Value::Object(function))
                        .map_err(|err| self.binding_error(err))?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Decide whether a loop keeps going after its body completed.
fn after_iteration(completion: Completion, labels: &[Symbol], last: &mut Option<Value>) -> Iteration {
    match completion {
        Completion::Normal(value) => {
            if value.is_some() {
                *last = value;
            }
            Iteration::Next
        }
        Completion::Continue(None) => Iteration::Next,
        Completion::Continue(Some(label)) if labels.contains(&label) => Iteration::Next,
        Completion::Break(None) => Iteration::Exit(Completion::Normal(last.take())),
        Completion::Break(Some(label)) if labels.contains(&label) => {
            Iteration::Exit(Completion::Normal(last.take()))
        }
        other => Iteration::Exit(other),
    }
}

fn has_lexical_declarations(statements: &[Statement]) -> bool {
    statements.iter().any(|statement| match statement {
        Statement::VariableDecl(decl) => decl.kind != VariableKind::Var,
        Statement::FunctionDecl(_) => true,
        _ => false,
    })
}

fn collect_var_names(statements: &[Statement], names: &mut Vec<Symbol>) {
    for statement in statements {
        collect_from_statement(statement, names);
    }
}

fn collect_from_statement(statement: &Statement, names: &mut Vec<Symbol>) {
    match statement {
        Statement::VariableDecl(decl) if decl.kind == VariableKind::Var => {
            names.extend(decl.declarations.iter().map(|declarator| declarator.id.name));
        }
        Statement::Block(block) => collect_var_names(&block.statements, names),
        Statement::If(stmt) => {
            collect_from_statement(&stmt.consequent, names);
            if let Some(alternate) = &stmt.alternate {
                collect_from_statement(alternate, names);
            }
        }
        Statement::While(stmt) => collect_from_statement(&stmt.body, names),
        Statement::DoWhile(stmt) => collect_from_statement(&stmt.body, names),
        Statement::For(stmt) => {
            if let Some(ForInit::VariableDecl(decl)) = &stmt.init {
                if decl.kind == VariableKind::Var {
                    names.extend(decl.declarations.iter().map(|declarator| declarator.id.name));
                }
            }
            collect_from_statement(&stmt.body, names);
        }
        Statement::ForIn(stmt) => {
            if let ForInTarget::Declaration(VariableKind::Var, id) = &stmt.target {
                names.push(id.name);
            }
            collect_from_statement(&stmt.body, names);
        }
        Statement::Try(stmt) => {
            collect_var_names(&stmt.block.statements, names);
            if let Some(catch) = &stmt.handler {
                collect_var_names(&catch.body.statements, names);
            }
            if let Some(finally) = &stmt.finalizer {
                collect_var_names(&finally.statements, names);
            }
        }
        Statement::With(stmt) => collect_from_statement(&stmt.body, names),
        Statement::Labeled(stmt) => collect_from_statement(&stmt.body, names),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_program, Interner};

    fn var_names(source: &str) -> Vec<String> {
        let mut interner = Interner::new();
        let program = parse_program(source, &mut interner, false).unwrap();
        let mut names = Vec::new();
        collect_var_names(&program.statements, &mut names);
        names.into_iter().map(|name| interner.resolve(name).to_string()).collect()
    }

    #[test]
    fn test_var_names_skip_nested_functions() {
        let names = var_names(
            "var a; if (x) { var b; } for (var c in o) {} function f() { var d; } var g = () => { var e; };",
        );
        assert_eq!(names, vec!["a", "b", "c", "g"]);
    }

    #[test]
    fn test_let_is_not_hoisted_to_var_scope() {
        let names = var_names("{ let a; const b = 1; } try { var c; } catch (e) { var d; }");
        assert_eq!(names, vec!["c", "d"]);
    }

    #[test]
    fn test_labeled_break_exits_matching_loop() {
        let mut last = None;
        let label = crate::parser::interner::sym::EMPTY;
        assert!(matches!(
            after_iteration(Completion::Break(Some(label)), &[label], &mut last),
            Iteration::Exit(Completion::Normal(None))
        ));
        assert!(matches!(
            after_iteration(Completion::Continue(Some(label)), &[], &mut last),
            Iteration::Exit(Completion::Continue(Some(_)))
        ));
    }
}
