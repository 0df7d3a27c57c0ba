use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, trace};
use memory::{new_table, Callable, Object, Scope};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::VmConfig;
use crate::error::RuntimeError;
use crate::opcode::{Instruction, Operand};
use crate::program::Program;
use crate::specs::NATIVE_TABLE;

use super::control::ControlFlowOps;
use super::dispatch::{DispatchTables, Flow};
use super::frame::Runnable;
use super::stack::{Slot, StackOps};

/// The Virtual Machine struct
pub struct VM {
    pub program: Program,
    pub config: VmConfig,
    pub stack: Vec<Slot>,
    pub frames: Vec<Runnable>,
    /// Scope holding the built-in bindings; parent of the script scope.
    pub builtins: Rc<Scope>,
    /// Scope of the top-level script.
    pub globals: Rc<Scope>,
    /// Source line of the instruction being executed.
    pub line: u32,
    pub out: Box<dyn Write>,
    pub rng: StdRng,
    tables: DispatchTables,
}

impl VM {
    /// Create a VM for `program`, printing to stdout.
    pub fn new(program: Program, config: VmConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let builtins = Scope::root();
        let globals = Scope::child(builtins.clone(), Some(new_table()));
        let script = Runnable::script(program.code.clone(), globals.clone());

        let mut vm = Self {
            program,
            config,
            stack: Vec::with_capacity(256),
            frames: Vec::with_capacity(64),
            builtins,
            globals,
            line: 0,
            out: Box::new(io::stdout()),
            rng,
            tables: DispatchTables::new(),
        };
        vm.frames.push(script);

        // Bootstrap native functions
        vm.bootstrap_natives();
        vm
    }

    /// Redirect `print` output.
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    fn bootstrap_natives(&mut self) {
        for (id, meta) in NATIVE_TABLE.iter().enumerate() {
            let id = id as u32;
            debug_assert_eq!(self.program.symbols.name_of(id), Some(meta.name));
            self.builtins
                .define(id, Object::Callable(Callable::Native { id }));
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Current value of a top-level variable, by name.
    pub fn global(&self, name: &str) -> Option<Object> {
        let id = self.program.symbols.id_of(name)?;
        self.globals.lookup(id)
    }

    pub fn render(&self, obj: &Object) -> String {
        obj.render(&self.program.symbols)
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Stack height below which the current runnable may not pop.
    pub fn frame_base(&self) -> usize {
        self.frames.last().map_or(0, |f| f.stack_base)
    }

    pub fn frame(&self) -> Result<&Runnable, RuntimeError> {
        self.frames
            .last()
            .ok_or_else(|| RuntimeError::invalid("no active runnable", self.line))
    }

    pub fn frame_mut(&mut self) -> Result<&mut Runnable, RuntimeError> {
        let line = self.line;
        self.frames
            .last_mut()
            .ok_or_else(|| RuntimeError::invalid("no active runnable", line))
    }

    /// Main interpretation loop
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        debug!(
            "running {} instructions, {} functions",
            self.program.code.len(),
            self.program.functions.len()
        );

        loop {
            let Some(frame) = self.frames.last() else {
                break;
            };

            let Some(instruction) = frame.code.get(frame.ip).copied() else {
                if frame.is_script() {
                    break;
                }
                // running off the end of a function returns null
                self.push_value(Object::Null)?;
                self.return_from()?;
                continue;
            };

            self.line = instruction.line;
            if self.config.trace {
                trace!(
                    "[{}] {:04} {}  (stack {})",
                    self.frames.len(),
                    frame.ip,
                    instruction,
                    self.stack.len()
                );
            }

            match self.execute(instruction)? {
                Flow::Next => self.frame_mut()?.ip += 1,
                Flow::Jumped => {}
                Flow::Halt => break,
            }
        }

        debug!("halted at line {}", self.line);
        Ok(())
    }

    fn execute(&mut self, instruction: Instruction) -> Result<Flow, RuntimeError> {
        let op = instruction.op;
        let idx = op as usize;
        let missing = || {
            RuntimeError::invalid(
                format!("{} cannot be executed with operand {:?}", op, instruction.operand),
                instruction.line,
            )
        };

        match instruction.operand {
            Operand::None => {
                let handler = self.tables.simple[idx].ok_or_else(missing)?;
                handler(self, op)
            }
            Operand::Word(word) => {
                let handler = self.tables.word[idx].ok_or_else(missing)?;
                handler(self, op, word)
            }
            Operand::Wide(wide) => {
                let handler = self.tables.wide[idx].ok_or_else(missing)?;
                handler(self, wide)
            }
        }
    }
}
