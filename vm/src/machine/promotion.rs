//! Operator semantics over [`Object`] with numeric promotion.
//!
//! Int op Int stays Int; anything involving a Float promotes to Float;
//! Bool counts as Int 0/1 except Bool op Bool, which is logical.

use std::cmp::Ordering;

use memory::Object;

use crate::error::RuntimeError;
use crate::opcode::OpCode;

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f32),
}

fn numeric(obj: &Object) -> Option<Num> {
    match obj {
        Object::Int(i) => Some(Num::Int(*i)),
        Object::Bool(b) => Some(Num::Int(*b as i64)),
        Object::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

fn unsupported(op: OpCode, left: &Object, right: &Object, line: u32) -> RuntimeError {
    RuntimeError::operation(
        format!(
            "unsupported operand types for {}: {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ),
        line,
    )
}

/// Trait for type promotion operations
pub trait TypePromotion {
    fn binary_op(&self, op: OpCode, left: &Object, right: &Object) -> Result<Object, RuntimeError>;
    fn unary_op(&self, op: OpCode, operand: &Object) -> Result<Object, RuntimeError>;
    fn compare_op(&self, op: OpCode, left: &Object, right: &Object) -> Result<Object, RuntimeError>;
}

impl TypePromotion for super::vm::VM {
    fn binary_op(&self, op: OpCode, left: &Object, right: &Object) -> Result<Object, RuntimeError> {
        binary(op, left, right, self.line)
    }

    fn unary_op(&self, op: OpCode, operand: &Object) -> Result<Object, RuntimeError> {
        unary(op, operand, self.line)
    }

    fn compare_op(&self, op: OpCode, left: &Object, right: &Object) -> Result<Object, RuntimeError> {
        compare(op, left, right, self.line)
    }
}

/// `+ - * / % ^ << >>`.
pub fn binary(op: OpCode, left: &Object, right: &Object, line: u32) -> Result<Object, RuntimeError> {
    if let (OpCode::Add, Object::Str(a), Object::Str(b)) = (op, left, right) {
        let mut joined = String::with_capacity(a.len() + b.len());
        joined.push_str(a);
        joined.push_str(b);
        return Ok(Object::Str(joined.into()));
    }

    if let (Object::Bool(a), Object::Bool(b)) = (left, right) {
        return match op {
            OpCode::Add => Ok(Object::Bool(*a || *b)),
            OpCode::Mul => Ok(Object::Bool(*a && *b)),
            OpCode::Sub => Ok(Object::Bool(*a != *b)),
            OpCode::Shl | OpCode::Shr => shift(op, *a as i64, *b as i64, line),
            _ => Err(unsupported(op, left, right, line)),
        };
    }

    let (Some(a), Some(b)) = (numeric(left), numeric(right)) else {
        return Err(unsupported(op, left, right, line));
    };
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => match op {
            OpCode::Shl | OpCode::Shr => shift(op, x, y, line),
            _ => int_arith(op, x, y, line),
        },
        _ if matches!(op, OpCode::Shl | OpCode::Shr) => Err(unsupported(op, left, right, line)),
        (a, b) => float_arith(op, as_f32(a), as_f32(b), line),
    }
}

fn as_f32(n: Num) -> f32 {
    match n {
        Num::Int(i) => i as f32,
        Num::Float(f) => f,
    }
}

fn int_arith(op: OpCode, x: i64, y: i64, line: u32) -> Result<Object, RuntimeError> {
    let value = match op {
        OpCode::Add => x.wrapping_add(y),
        OpCode::Sub => x.wrapping_sub(y),
        OpCode::Mul => x.wrapping_mul(y),
        OpCode::Div => {
            if y == 0 {
                return Err(RuntimeError::operation("division by zero", line));
            }
            x.wrapping_div(y)
        }
        OpCode::Mod => {
            if y == 0 {
                return Err(RuntimeError::operation("modulo by zero", line));
            }
            x.wrapping_rem(y)
        }
        OpCode::Pow => {
            if y < 0 {
                return Ok(Object::Float((x as f32).powf(y as f32)));
            }
            wrapping_pow(x, y as u64)
        }
        _ => {
            return Err(RuntimeError::invalid(
                format!("{} is not an arithmetic opcode", op.name()),
                line,
            ))
        }
    };
    Ok(Object::Int(value))
}

fn wrapping_pow(mut base: i64, mut exp: u64) -> i64 {
    let mut acc: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}

fn float_arith(op: OpCode, x: f32, y: f32, line: u32) -> Result<Object, RuntimeError> {
    let value = match op {
        OpCode::Add => x + y,
        OpCode::Sub => x - y,
        OpCode::Mul => x * y,
        OpCode::Div => x / y,
        OpCode::Mod => x % y,
        OpCode::Pow => x.powf(y),
        _ => {
            return Err(RuntimeError::invalid(
                format!("{} is not an arithmetic opcode", op.name()),
                line,
            ))
        }
    };
    Ok(Object::Float(value))
}

fn shift(op: OpCode, x: i64, y: i64, line: u32) -> Result<Object, RuntimeError> {
    if y < 0 {
        return Err(RuntimeError::operation("negative shift count", line));
    }
    let amount = u32::try_from(y).unwrap_or(u32::MAX);
    let value = match op {
        OpCode::Shl => x.checked_shl(amount).unwrap_or(0),
        _ => x.checked_shr(amount).unwrap_or(if x < 0 { -1 } else { 0 }),
    };
    Ok(Object::Int(value))
}

/// Unary `-` and `!`.
pub fn unary(op: OpCode, operand: &Object, line: u32) -> Result<Object, RuntimeError> {
    match (op, operand) {
        (OpCode::Not, v) => Ok(Object::Bool(!v.is_truthy())),
        (OpCode::Neg, Object::Int(i)) => Ok(Object::Int(i.wrapping_neg())),
        (OpCode::Neg, Object::Float(f)) => Ok(Object::Float(-f)),
        (OpCode::Neg, Object::Bool(b)) => Ok(Object::Int(-(*b as i64))),
        (_, v) => Err(RuntimeError::operation(
            format!("bad operand type for unary {}: {}", op.symbol(), v.type_name()),
            line,
        )),
    }
}

/// Total equality: Int and Float compare numerically, containers and
/// callables by identity, different types are unequal.
pub fn equals(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Int(i), Object::Float(f)) | (Object::Float(f), Object::Int(i)) => *i as f32 == *f,
        _ => left.same(right),
    }
}

fn ordering(left: &Object, right: &Object) -> Option<Ordering> {
    match (left, right) {
        (Object::Int(a), Object::Int(b)) => Some(a.cmp(b)),
        (Object::Int(a), Object::Float(b)) => (*a as f32).partial_cmp(b),
        (Object::Float(a), Object::Int(b)) => a.partial_cmp(&(*b as f32)),
        (Object::Float(a), Object::Float(b)) => a.partial_cmp(b),
        _ => None,
    }
}

/// `== != < <= > >= && ||`.
pub fn compare(op: OpCode, left: &Object, right: &Object, line: u32) -> Result<Object, RuntimeError> {
    let result = match op {
        OpCode::Eq => equals(left, right),
        OpCode::Ne => !equals(left, right),
        OpCode::And => left.is_truthy() && right.is_truthy(),
        OpCode::Or => left.is_truthy() || right.is_truthy(),
        OpCode::Lt | OpCode::Le | OpCode::Gt | OpCode::Ge => {
            let numeric_pair = matches!(left, Object::Int(_) | Object::Float(_))
                && matches!(right, Object::Int(_) | Object::Float(_));
            if !numeric_pair {
                return Err(unsupported(op, left, right, line));
            }
            // NaN compares false under every relation
            match ordering(left, right) {
                None => false,
                Some(ord) => match op {
                    OpCode::Lt => ord == Ordering::Less,
                    OpCode::Le => ord != Ordering::Greater,
                    OpCode::Gt => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                },
            }
        }
        _ => {
            return Err(RuntimeError::invalid(
                format!("{} is not a comparison opcode", op.name()),
                line,
            ))
        }
    };
    Ok(Object::Bool(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(op: OpCode, a: Object, b: Object) -> Object {
        binary(op, &a, &b, 1).unwrap()
    }

    #[test]
    fn int_float_promotion() {
        assert!(matches!(bin(OpCode::Add, Object::Int(3), Object::Float(1.5)), Object::Float(f) if f == 4.5));
        assert!(matches!(bin(OpCode::Add, Object::Int(3), Object::Int(4)), Object::Int(7)));
        assert!(matches!(bin(OpCode::Div, Object::Int(7), Object::Int(2)), Object::Int(3)));
        assert!(matches!(bin(OpCode::Div, Object::Float(7.0), Object::Int(2)), Object::Float(f) if f == 3.5));
    }

    #[test]
    fn bool_arithmetic() {
        assert!(matches!(bin(OpCode::Add, Object::Bool(true), Object::Int(2)), Object::Int(3)));
        assert!(matches!(bin(OpCode::Add, Object::Bool(true), Object::Bool(true)), Object::Bool(true)));
        assert!(matches!(bin(OpCode::Mul, Object::Bool(true), Object::Bool(false)), Object::Bool(false)));
        assert!(matches!(bin(OpCode::Sub, Object::Bool(true), Object::Bool(true)), Object::Bool(false)));
        assert!(binary(OpCode::Div, &Object::Bool(true), &Object::Bool(true), 1).is_err());
    }

    #[test]
    fn wrapping_and_zero_division() {
        assert!(matches!(bin(OpCode::Add, Object::Int(i64::MAX), Object::Int(1)), Object::Int(i64::MIN)));
        let err = binary(OpCode::Div, &Object::Int(1), &Object::Int(0), 9).unwrap_err();
        assert_eq!(err.kind(), "OperationError");
        assert_eq!(err.line(), 9);
        assert!(binary(OpCode::Mod, &Object::Int(1), &Object::Int(0), 1).is_err());
    }

    #[test]
    fn power() {
        assert!(matches!(bin(OpCode::Pow, Object::Int(2), Object::Int(10)), Object::Int(1024)));
        assert!(matches!(bin(OpCode::Pow, Object::Int(2), Object::Int(-1)), Object::Float(f) if f == 0.5));
        assert!(matches!(bin(OpCode::Pow, Object::Float(4.0), Object::Float(0.5)), Object::Float(f) if f == 2.0));
    }

    #[test]
    fn shifts_need_integers() {
        assert!(matches!(bin(OpCode::Shl, Object::Int(1), Object::Int(4)), Object::Int(16)));
        assert!(matches!(bin(OpCode::Shr, Object::Int(-8), Object::Int(1)), Object::Int(-4)));
        assert!(matches!(bin(OpCode::Shl, Object::Int(1), Object::Int(64)), Object::Int(0)));
        assert!(binary(OpCode::Shl, &Object::Float(1.0), &Object::Int(1), 1).is_err());
        assert!(binary(OpCode::Shl, &Object::Int(1), &Object::Int(-1), 1).is_err());
    }

    #[test]
    fn string_concatenation_only_for_plus() {
        assert!(matches!(bin(OpCode::Add, Object::str("ab"), Object::str("c")), Object::Str(s) if &*s == "abc"));
        let err = binary(OpCode::Sub, &Object::str("a"), &Object::str("b"), 1).unwrap_err();
        assert!(err.to_string().contains("string and string"));
        assert!(binary(OpCode::Add, &Object::str("a"), &Object::Int(1), 1).is_err());
    }

    #[test]
    fn equality_is_total() {
        assert!(equals(&Object::Int(1), &Object::Float(1.0)));
        assert!(!equals(&Object::Int(1), &Object::Bool(true)));
        assert!(!equals(&Object::Null, &Object::Int(0)));
        assert!(equals(&Object::str("x"), &Object::str("x")));
    }

    #[test]
    fn relational_requires_numbers() {
        assert!(matches!(compare(OpCode::Lt, &Object::Int(1), &Object::Float(1.5), 1), Ok(Object::Bool(true))));
        assert!(matches!(compare(OpCode::Ge, &Object::Int(2), &Object::Int(2), 1), Ok(Object::Bool(true))));
        assert!(compare(OpCode::Lt, &Object::str("a"), &Object::str("b"), 1).is_err());
        assert!(compare(OpCode::Lt, &Object::Bool(true), &Object::Int(2), 1).is_err());
    }

    #[test]
    fn logical_ops_use_truthiness() {
        assert!(matches!(compare(OpCode::And, &Object::Int(1), &Object::str(""), 1), Ok(Object::Bool(false))));
        assert!(matches!(compare(OpCode::Or, &Object::Null, &Object::Float(0.1), 1), Ok(Object::Bool(true))));
    }

    #[test]
    fn unary_ops() {
        assert!(matches!(unary(OpCode::Neg, &Object::Bool(true), 1), Ok(Object::Int(-1))));
        assert!(matches!(unary(OpCode::Not, &Object::Int(0), 1), Ok(Object::Bool(true))));
        assert!(unary(OpCode::Neg, &Object::str("x"), 1).is_err());
    }
}
