use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rhai::{Dynamic, Engine, EvalAltResult, Scope, AST};

use crate::backend::{BackendId, ScriptBackend, ScriptKey, ScriptKind};
use crate::events::{EventPayload, QuestEvent};

pub const RHAI_EXTENSION: &str = "rhai";

/// Quest scripts written in Rhai. One engine, one compiled AST per
/// `(kind, key)` slot. Handlers are script functions named after the
/// event (`fn EVENT_SAY(actor, target, data, extra) { .. }`).
pub struct RhaiBackend {
    engine: Engine,
    scripts: HashMap<(ScriptKind, ScriptKey), CompiledScript>,
    vars: HashMap<String, String>,
}

struct CompiledScript {
    ast: AST,
    path: PathBuf,
}

impl RhaiBackend {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.set_fast_operators(true);
        Self { engine, scripts: HashMap::new(), vars: HashMap::new() }
    }

    pub fn loaded_count(&self) -> usize {
        self.scripts.len()
    }

    fn compile(&self, path: &Path) -> Result<AST> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        self.engine
            .compile(source)
            .with_context(|| format!("Compiling {}", path.display()))
    }

    fn call_scope(&self) -> Scope<'static> {
        let mut scope = Scope::new();
        for (name, value) in &self.vars {
            scope.push_constant(name.clone(), value.clone());
        }
        scope
    }
}

impl Default for RhaiBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptBackend for RhaiBackend {
    fn identifier(&self) -> BackendId {
        BackendId(0x7268_6169)
    }

    fn load(&mut self, kind: ScriptKind, path: &Path, key: &ScriptKey) {
        match self.compile(path) {
            Ok(ast) => {
                self.scripts
                    .insert((kind, key.clone()), CompiledScript { ast, path: path.to_path_buf() });
            }
            Err(err) => {
                // The slot stays empty; the router still records the load
                // as done and will not retry until the next reload.
                eprintln!("[rhai] load failed for {kind:?}/{key}: {err:?}");
                self.scripts.remove(&(kind, key.clone()));
            }
        }
    }

    fn has_handler(&self, kind: ScriptKind, key: &ScriptKey, event_name: &str) -> bool {
        self.scripts
            .get(&(kind, key.clone()))
            .map(|script| script.ast.iter_functions().any(|f| f.name == event_name))
            .unwrap_or(false)
    }

    fn dispatch(&mut self, kind: ScriptKind, key: &ScriptKey, event: QuestEvent, payload: &EventPayload) {
        let Some(script) = self.scripts.get(&(kind, key.clone())) else {
            return;
        };
        let actor = payload.actor.map(|m| m.0 as i64).unwrap_or(-1);
        let target = payload.target.map(|m| m.0 as i64).unwrap_or(-1);
        let mut scope = self.call_scope();
        let args = (actor, target, payload.data.clone(), payload.extra as i64);
        match self.engine.call_fn::<Dynamic>(&mut scope, &script.ast, event.name(), args) {
            Ok(_) => {}
            Err(err) => {
                if !matches!(err.as_ref(), EvalAltResult::ErrorFunctionNotFound(..)) {
                    eprintln!(
                        "[rhai] {} handler {} failed: {err}",
                        script.path.display(),
                        event.name()
                    );
                }
            }
        }
    }

    fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn reload(&mut self) {
        self.scripts.clear();
    }
}
