// SPDX-License-Identifier: MPL-2.0

//! The optimizer driver's back-end abstraction.
//!
//! The optimizer is abstracted behind the [`Optimizer`] trait, exposing
//! exactly the capability set a pseudo-boolean/ILP/SMT-with-optimization
//! back-end needs to provide: assert a Boolean clause, bind a named integer
//! to an expression's value, minimize a named integer, check under a
//! wall-clock bound, and read a Boolean's value back out of the model. Any
//! back-end meeting this contract is a drop-in replacement.
//!
//! This crate ships one concrete implementation, [`Z3Optimizer`], built on
//! the `z3` crate.

use std::cell::RefCell;
use std::time::Duration;

use rustc_hash::FxHashMap;
use z3::ast::{Ast, Bool, Int};
use z3::{Context, Model, Optimize, Params, SatResult};

use crate::expr::{BoolExpr, IntExpr};

/// The outcome of a single bounded [`Optimizer::check`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A satisfying, cost-minimal model was found.
    Sat,
    /// The asserted formula has no model.
    Unsat,
    /// The back-end could not decide within its bound (e.g. the timeout
    /// elapsed).
    Unknown,
}

/// The capability set a pseudo-boolean/ILP/SMT-with-optimization back-end
/// must provide for the optimizer driver.
pub trait Optimizer {
    /// Assert that `expr` holds.
    fn assert_bool(&self, expr: &BoolExpr);

    /// Binds the named integer variable to `expr`'s value (`name == expr`).
    fn bind_int(&self, name: &str, expr: &IntExpr);

    /// Minimizes the named integer variable, which must already have been
    /// bound via [`Optimizer::bind_int`].
    fn minimize(&self, name: &str);

    /// Checks satisfiability of everything asserted so far, bounded by
    /// `timeout`. A satisfying model, if any, is cached for subsequent
    /// [`Optimizer::model_value`] calls.
    fn check(&self, timeout: Duration) -> CheckOutcome;

    /// Reads a Boolean variable's value out of the model cached by the last
    /// [`Optimizer::check`] call that returned [`CheckOutcome::Sat`].
    fn model_value(&self, name: &str) -> Option<bool>;
}

/// A concrete [`Optimizer`] backed by the Z3 pseudo-boolean optimizer.
pub struct Z3Optimizer<'ctx> {
    ctx: &'ctx Context,
    opt: Optimize<'ctx>,
    bool_vars: RefCell<FxHashMap<String, Bool<'ctx>>>,
    model: RefCell<Option<Model<'ctx>>>,
}

impl<'ctx> Z3Optimizer<'ctx> {
    /// Builds a fresh optimizer against an existing [`Context`].
    ///
    /// The caller owns the `Context`; a driver that retries after an
    /// unlinearizable cycle can build a new [`Z3Optimizer`] per attempt
    /// while reusing the same `Context`.
    pub fn new(ctx: &'ctx Context) -> Self {
        Z3Optimizer {
            ctx,
            opt: Optimize::new(ctx),
            bool_vars: RefCell::new(FxHashMap::default()),
            model: RefCell::new(None),
        }
    }

    fn bool_var(&self, name: &str) -> Bool<'ctx> {
        if let Some(existing) = self.bool_vars.borrow().get(name) {
            return existing.clone();
        }
        let var = Bool::new_const(self.ctx, name);
        self.bool_vars.borrow_mut().insert(name.to_string(), var.clone());
        var
    }

    fn to_bool(&self, expr: &BoolExpr) -> Bool<'ctx> {
        match expr {
            BoolExpr::True => Bool::from_bool(self.ctx, true),
            BoolExpr::False => Bool::from_bool(self.ctx, false),
            BoolExpr::Var(name) => self.bool_var(name),
            BoolExpr::Not(e) => self.to_bool(e).not(),
            BoolExpr::And(es) => {
                if es.is_empty() {
                    return Bool::from_bool(self.ctx, true);
                }
                let asts: Vec<Bool<'ctx>> = es.iter().map(|e| self.to_bool(e)).collect();
                let refs: Vec<&Bool<'ctx>> = asts.iter().collect();
                Bool::and(self.ctx, &refs)
            }
            BoolExpr::Or(es) => {
                if es.is_empty() {
                    return Bool::from_bool(self.ctx, false);
                }
                let asts: Vec<Bool<'ctx>> = es.iter().map(|e| self.to_bool(e)).collect();
                let refs: Vec<&Bool<'ctx>> = asts.iter().collect();
                Bool::or(self.ctx, &refs)
            }
            BoolExpr::Implies(a, b) => self.to_bool(a).implies(&self.to_bool(b)),
            BoolExpr::Iff(a, b) => self.to_bool(a)._eq(&self.to_bool(b)),
            BoolExpr::AtMostK { vars, k } => {
                let asts: Vec<Bool<'ctx>> = vars.iter().map(|v| self.bool_var(v)).collect();
                let pairs: Vec<(&Bool<'ctx>, i32)> = asts.iter().map(|b| (b, 1)).collect();
                Bool::pb_le(self.ctx, &pairs, *k as i32)
            }
        }
    }

    fn to_int(&self, expr: &IntExpr) -> Int<'ctx> {
        match expr {
            IntExpr::Const(c) => Int::from_i64(self.ctx, *c),
            IntExpr::Sum(es) => {
                if es.is_empty() {
                    return Int::from_i64(self.ctx, 0);
                }
                let asts: Vec<Int<'ctx>> = es.iter().map(|e| self.to_int(e)).collect();
                let refs: Vec<&Int<'ctx>> = asts.iter().collect();
                Int::add(self.ctx, &refs)
            }
            IntExpr::IfThenElse { cond, then, otherwise } => {
                let cond = self.to_bool(cond);
                let then = self.to_int(then);
                let otherwise = self.to_int(otherwise);
                cond.ite(&then, &otherwise)
            }
        }
    }
}

impl<'ctx> Optimizer for Z3Optimizer<'ctx> {
    fn assert_bool(&self, expr: &BoolExpr) {
        let ast = self.to_bool(expr);
        self.opt.assert(&ast);
    }

    fn bind_int(&self, name: &str, expr: &IntExpr) {
        let var = Int::new_const(self.ctx, name);
        let value = self.to_int(expr);
        self.opt.assert(&var._eq(&value));
    }

    fn minimize(&self, name: &str) {
        let var = Int::new_const(self.ctx, name);
        self.opt.minimize(&var);
    }

    fn check(&self, timeout: Duration) -> CheckOutcome {
        let mut params = Params::new(self.ctx);
        params.set_u32("timeout", timeout.as_millis().min(u32::MAX as u128) as u32);
        self.opt.set_params(&params);
        match self.opt.check(&[]) {
            SatResult::Sat => {
                *self.model.borrow_mut() = self.opt.get_model();
                CheckOutcome::Sat
            }
            SatResult::Unsat => CheckOutcome::Unsat,
            SatResult::Unknown => CheckOutcome::Unknown,
        }
    }

    fn model_value(&self, name: &str) -> Option<bool> {
        let model = self.model.borrow();
        let model = model.as_ref()?;
        let var = self.bool_var(name);
        model.eval(&var, true)?.as_bool()
    }
}
