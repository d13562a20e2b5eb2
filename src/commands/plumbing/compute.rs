use crate::areas::session::Session;
use crate::artifacts::options::DiffOptions;
use crate::artifacts::wire::DiffWire;
use std::path::Path;

impl Session {
    /// Print the wire encoding of the diff between two files
    pub fn compute(
        &self,
        original: &Path,
        modified: &Path,
        options: &DiffOptions,
        pretty: bool,
    ) -> anyhow::Result<()> {
        let a = self.workspace().read_document(original)?;
        let b = self.workspace().read_document(modified)?;
        let (a_lines, b_lines) = (a.lines(), b.lines());

        let diff = self.computer().compute_diff(&a_lines, &b_lines, options);
        let wire = DiffWire::from_lines_diff(&diff, &a_lines, &b_lines);

        let json = if pretty {
            serde_json::to_string_pretty(&wire)?
        } else {
            serde_json::to_string(&wire)?
        };
        writeln!(self.writer(), "{}", json)?;

        Ok(())
    }
}
