use std::{io::Write, path::Path};

use lib_conserve::{
    color::Color,
    error::Result,
    renderer::{Renderer, ResidueSpec},
};
use log::trace;

/// Renders into a PyMOL command script.
///
/// The structure sequence cannot be queried from a script, so it is supplied up front.
pub struct PmlScriptRenderer<W> {
    output: W,
    structure_sequence: String,
}

impl<W: Write> PmlScriptRenderer<W> {
    pub fn new(output: W, structure_sequence: String) -> Self {
        Self {
            output,
            structure_sequence,
        }
    }

    pub fn load_structure(&mut self, path: &Path, object: &str) -> Result<()> {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.command(format_args!("load {}, {object}", path.display()))
    }

    /// Flushes and returns the output.
    pub fn finish(mut self) -> Result<W> {
        self.output.flush()?;
        Ok(self.output)
    }

    fn command(&mut self, command: std::fmt::Arguments<'_>) -> Result<()> {
        trace!("{command}");
        writeln!(self.output, "{command}")?;
        Ok(())
    }
}

impl<W: Write> Renderer for PmlScriptRenderer<W> {
    fn structure_sequence(&mut self, _selection: &str) -> Result<String> {
        Ok(self.structure_sequence.clone())
    }

    fn clone_object(&mut self, selection: &str, new_name: &str) -> Result<()> {
        self.command(format_args!("create {new_name}, {selection}"))
    }

    fn color_object(&mut self, name: &str, color: Color) -> Result<()> {
        self.command(format_args!("color {color}, {name}"))
    }

    fn color_residues(&mut self, name: &str, residues: ResidueSpec, color: Color) -> Result<()> {
        self.command(format_args!("color {color}, {}", residues.selection(name)))
    }
}

#[cfg(test)]
mod tests {
    use lib_conserve::{
        color::{Color, NEUTRAL_COLOR},
        renderer::{Renderer, ResidueSpec},
    };

    use super::PmlScriptRenderer;

    #[test]
    fn test_commands() {
        let mut renderer = PmlScriptRenderer::new(Vec::new(), "MKV".to_string());
        assert_eq!(renderer.structure_sequence("prot").unwrap(), "MKV");
        renderer.clone_object("prot", "prot_cp").unwrap();
        renderer.color_object("prot_cp", NEUTRAL_COLOR).unwrap();
        renderer
            .color_residues("prot_cp", ResidueSpec::single(2), Color::Rgb(0xff8a8a))
            .unwrap();
        renderer
            .color_residues(
                "prot_cp",
                ResidueSpec { first: 3, last: 9 },
                Color::Rgb(0x750000),
            )
            .unwrap();

        let script = String::from_utf8(renderer.finish().unwrap()).unwrap();
        assert_eq!(
            script,
            "create prot_cp, prot\n\
             color grey60, prot_cp\n\
             color 0xff8a8a, resi 2 and prot_cp\n\
             color 0x750000, resi 3-9 and prot_cp\n"
        );
    }
}
