use crate::areas::computer::LinesDiffComputer;
use crate::areas::workspace::Workspace;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Everything a command needs: where files live, the engine, and where output goes
pub struct Session {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    workspace: Workspace,
    computer: LinesDiffComputer,
}

impl Session {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;

        if !path.is_dir() {
            anyhow::bail!("The specified path is not a directory: {:?}", path);
        }

        let workspace = Workspace::new(path.clone().into_boxed_path());

        Ok(Session {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            workspace,
            computer: LinesDiffComputer::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn computer(&self) -> &LinesDiffComputer {
        &self.computer
    }
}
