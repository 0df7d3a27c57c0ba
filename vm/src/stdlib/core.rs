use std::thread;
use std::time::Duration;

use memory::{Object, Tuple};
use rand::Rng;

use crate::error::RuntimeError;
use crate::native::NativeContext;

pub fn native_print(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    let text = args
        .iter()
        .map(|arg| arg.render(ctx.symbols))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(ctx.out, "{text}")
        .map_err(|e| RuntimeError::operation(format!("print failed: {e}"), ctx.line))?;
    Ok(Object::Null)
}

pub fn native_sleep(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("sleep", args, 1)?;
    let seconds = ctx.number("sleep", &args[0])?;
    if !(seconds >= 0.0) {
        return Err(ctx.argument_error("sleep() expects a non-negative duration"));
    }
    thread::sleep(Duration::from_millis((seconds * 1000.0) as u64));
    Ok(Object::Null)
}

pub fn native_dice(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("dice", args, 1)?;
    let probability = ctx.number("dice", &args[0])?;
    let draw: f32 = ctx.rng.gen();
    Ok(Object::Bool(draw < probability))
}

pub fn native_randint(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("randint", args, 2)?;
    let low = ctx.integer("randint", &args[0])?;
    let high = ctx.integer("randint", &args[1])?;
    if low >= high {
        return Err(ctx.argument_error(format!(
            "randint() expects low < high, got {low} and {high}"
        )));
    }
    Ok(Object::Int(ctx.rng.gen_range(low..high)))
}

pub fn native_random(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("random", args, 0)?;
    Ok(Object::Float(ctx.rng.gen::<f32>()))
}

pub fn native_pow(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("pow", args, 2)?;
    let base = ctx.number("pow", &args[0])?;
    let exp = ctx.number("pow", &args[1])?;
    Ok(Object::Float(base.powf(exp)))
}

pub fn native_len(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("len", args, 1)?;
    let len = match &args[0] {
        Object::Str(s) => s.chars().count(),
        Object::List(l) => l.borrow().len(),
        Object::Table(t) => t.borrow().len(),
        Object::Tuple(t) => t.len(),
        other => {
            return Err(ctx.type_error(format!(
                "len() expects a string, list, table or tuple, got {}",
                other.type_name()
            )))
        }
    };
    Ok(Object::Int(len as i64))
}

pub fn native_push(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("push", args, 2)?;
    match &args[0] {
        Object::List(l) => {
            l.borrow_mut().push(args[1].clone());
            Ok(Object::Null)
        }
        other => Err(ctx.type_error(format!(
            "push() expects a list, got {}",
            other.type_name()
        ))),
    }
}

pub fn native_pop(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("pop", args, 1)?;
    match &args[0] {
        Object::List(l) => Ok(l.borrow_mut().pop().unwrap_or(Object::Null)),
        other => Err(ctx.type_error(format!(
            "pop() expects a list, got {}",
            other.type_name()
        ))),
    }
}

pub fn native_typeof(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError> {
    ctx.arity("typeof", args, 1)?;
    Ok(Object::str(args[0].type_name()))
}
