use std::collections::HashMap;
use std::f64::consts::{E, PI};

use crate::error::CalcError;
use crate::parser::{self, Expr};

#[derive(Debug, Clone)]
pub struct Scope {
    vars: HashMap<String, f64>,
}

impl Scope {
    pub fn new() -> Self {
        let mut this = Scope {
            vars: HashMap::new(),
        };
        this.populate_initial_vars();
        this
    }

    fn populate_initial_vars(&mut self) {
        self.vars.insert("pi".into(), PI);
        self.vars.insert("e".into(), E);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    // Walks the tree with an explicit stack; operator chains are as deep as
    // they are long. Division by zero yields an infinity (or NaN for 0/0),
    // callers decide what to do with it.
    pub fn eval(&self, expr: Expr) -> Result<f64, CalcError> {
        let mut steps = vec![Step::Visit(expr)];
        let mut values: Vec<f64> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Expr::Number(num)) => values.push(num),
                Step::Visit(Expr::Var(name)) => values.push(
                    self.get(&name)
                        .ok_or_else(|| CalcError::UnknownVariable(name))?,
                ),
                Step::Visit(Expr::Add(a, b)) => steps.extend(binary(|a, b| a + b, *a, *b)),
                Step::Visit(Expr::Sub(a, b)) => steps.extend(binary(|a, b| a - b, *a, *b)),
                Step::Visit(Expr::Mul(a, b)) => steps.extend(binary(|a, b| a * b, *a, *b)),
                Step::Visit(Expr::Div(a, b)) => steps.extend(binary(|a, b| a / b, *a, *b)),
                Step::Visit(Expr::Neg(val)) => {
                    steps.push(Step::Negate);
                    steps.push(Step::Visit(*val));
                }
                Step::Apply(op) => {
                    let b = values.pop().unwrap_or(f64::NAN);
                    let a = values.pop().unwrap_or(f64::NAN);
                    values.push(op(a, b));
                }
                Step::Negate => {
                    let val = values.pop().unwrap_or(f64::NAN);
                    values.push(-val);
                }
            }
        }
        Ok(values.pop().unwrap_or(f64::NAN))
    }
}

enum Step {
    Visit(Expr),
    Apply(fn(f64, f64) -> f64),
    Negate,
}

// Pushed in reverse: the left operand is visited first, the operator runs
// once both values are on the stack.
fn binary(op: fn(f64, f64) -> f64, a: Expr, b: Expr) -> [Step; 3] {
    [Step::Apply(op), Step::Visit(b), Step::Visit(a)]
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new()
    }
}

pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let expr = parser::parse(input)?;
    Scope::new().eval(expr)
}
