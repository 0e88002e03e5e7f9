use std::sync::{Arc, Mutex};

use sketchpad::errors::Result;
use sketchpad::exec::{CommandRunner, CommandStatus};

type Hook = Box<dyn Fn(&str) + Send + Sync>;

/// A fake command runner that:
/// - records foreground and background command lines separately
/// - returns a fixed exit status for foreground runs
/// - optionally calls a hook while "running", e.g. to simulate an edit.
pub struct FakeRunner {
    status: CommandStatus,
    hook: Option<Hook>,
    ran: Arc<Mutex<Vec<String>>>,
    spawned: Arc<Mutex<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            status: CommandStatus { code: Some(0) },
            hook: None,
            ran: Arc::new(Mutex::new(Vec::new())),
            spawned: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.status = CommandStatus { code: Some(code) };
        self
    }

    pub fn on_run(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn ran(&self) -> Vec<String> {
        self.ran.lock().unwrap().clone()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, cmd: &str) -> Result<CommandStatus> {
        self.ran.lock().unwrap().push(cmd.to_string());
        if let Some(hook) = &self.hook {
            hook(cmd);
        }
        Ok(self.status)
    }

    fn spawn(&self, cmd: &str) -> Result<()> {
        self.spawned.lock().unwrap().push(cmd.to_string());
        Ok(())
    }
}
