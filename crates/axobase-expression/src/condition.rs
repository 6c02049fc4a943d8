//! Activation conditions — a tiny total language over the environment.
//!
//! Grammar: `<identifier> <op> <literal>` where identifiers are
//! `balance`, `starving`, `thriving`, `mode`; operators are
//! `>`, `<`, `>=`, `<=`, `=`; literals are numbers or mode words.
//! Unknown identifiers evaluate to true (conservative: an unrecognized
//! trigger keeps the gene expressed). Parse failures are reported to the
//! caller, which treats the gene as active and records a warning.

use axobase_core::environment::{EnvironmentalState, OperationMode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid condition '{condition}': {reason}")]
pub struct ConditionParseError {
    pub condition: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Ident {
    Balance,
    Starving,
    Thriving,
    Mode,
    /// Unrecognized identifier; the whole condition evaluates to true.
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Number(f64),
    Mode(OperationMode),
}

/// A parsed activation condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    ident: Ident,
    op: Op,
    literal: Literal,
}

/// Modes ordered by severity, so ordering comparisons are total.
fn mode_rank(mode: OperationMode) -> f64 {
    match mode {
        OperationMode::Normal => 0.0,
        OperationMode::LowPower => 1.0,
        OperationMode::Emergency => 2.0,
        OperationMode::Hibernation => 3.0,
    }
}

impl Condition {
    /// Parse a condition string. Both `balance < 5` and `balance<5` forms
    /// are accepted.
    pub fn parse(input: &str) -> Result<Self, ConditionParseError> {
        let err = |reason: &str| ConditionParseError {
            condition: input.to_string(),
            reason: reason.to_string(),
        };

        // Two-character operators first so ">=" does not split as ">", "=".
        let (op, op_str) = if input.contains(">=") {
            (Op::Ge, ">=")
        } else if input.contains("<=") {
            (Op::Le, "<=")
        } else if input.contains('>') {
            (Op::Gt, ">")
        } else if input.contains('<') {
            (Op::Lt, "<")
        } else if input.contains('=') {
            (Op::Eq, "=")
        } else {
            return Err(err("no comparison operator"));
        };

        let mut parts = input.splitn(2, op_str);
        let lhs = parts.next().unwrap_or("").trim();
        let rhs = parts.next().unwrap_or("").trim();
        if lhs.is_empty() || rhs.is_empty() {
            return Err(err("missing operand"));
        }

        let ident = match lhs {
            "balance" => Ident::Balance,
            "starving" => Ident::Starving,
            "thriving" => Ident::Thriving,
            "mode" => Ident::Mode,
            other => Ident::Unknown(other.to_string()),
        };

        let literal = if let Ok(n) = rhs.parse::<f64>() {
            Literal::Number(n)
        } else if let Some(mode) = OperationMode::from_word(rhs) {
            Literal::Mode(mode)
        } else {
            return Err(err("literal is neither a number nor a mode word"));
        };

        Ok(Self { ident, op, literal })
    }

    /// Evaluate against an environment snapshot.
    pub fn eval(&self, env: &EnvironmentalState) -> bool {
        let lhs = match &self.ident {
            Ident::Balance => env.balance,
            Ident::Starving => env.days_starving,
            Ident::Thriving => env.days_thriving,
            Ident::Mode => mode_rank(env.mode),
            Ident::Unknown(_) => return true,
        };
        let rhs = match &self.literal {
            Literal::Number(n) => *n,
            Literal::Mode(m) => mode_rank(*m),
        };
        match self.op {
            Op::Gt => lhs > rhs,
            Op::Lt => lhs < rhs,
            Op::Ge => lhs >= rhs,
            Op::Le => lhs <= rhs,
            Op::Eq => (lhs - rhs).abs() < f64::EPSILON,
        }
    }
}
