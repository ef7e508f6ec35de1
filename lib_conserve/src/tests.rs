use std::io::Write;

use tempfile::NamedTempFile;

use crate::{
    color::{Color, ColorScheme, NEUTRAL_COLOR},
    error::{Error, Result},
    mapper::{ConservationMapper, MapperConfig},
    renderer::{Renderer, ResidueSpec},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    CloneObject { selection: String, name: String },
    ColorObject { name: String, color: Color },
    ColorResidues {
        name: String,
        residues: ResidueSpec,
        color: Color,
    },
}

struct RecordingRenderer {
    sequence: String,
    sequence_requests: usize,
    commands: Vec<Command>,
}

impl RecordingRenderer {
    fn new(sequence: &str) -> Self {
        Self {
            sequence: sequence.to_string(),
            sequence_requests: 0,
            commands: Vec::new(),
        }
    }

    /// The color of each residue after replaying all commands on `name`.
    fn residue_colors(&self, name: &str, residue_count: usize) -> Vec<Option<Color>> {
        let mut colors = vec![None; residue_count];
        for command in &self.commands {
            match command {
                Command::ColorObject { name: n, color } if n == name => {
                    colors.iter_mut().for_each(|c| *c = Some(*color))
                }
                Command::ColorResidues {
                    name: n,
                    residues,
                    color,
                } if n == name => {
                    for residue_number in residues.first..=residues.last {
                        colors[residue_number - 1] = Some(*color);
                    }
                }
                _ => {}
            }
        }
        colors
    }
}

impl Renderer for RecordingRenderer {
    fn structure_sequence(&mut self, _selection: &str) -> Result<String> {
        self.sequence_requests += 1;
        Ok(self.sequence.clone())
    }

    fn clone_object(&mut self, selection: &str, new_name: &str) -> Result<()> {
        self.commands.push(Command::CloneObject {
            selection: selection.to_string(),
            name: new_name.to_string(),
        });
        Ok(())
    }

    fn color_object(&mut self, name: &str, color: Color) -> Result<()> {
        self.commands.push(Command::ColorObject {
            name: name.to_string(),
            color,
        });
        Ok(())
    }

    fn color_residues(&mut self, name: &str, residues: ResidueSpec, color: Color) -> Result<()> {
        self.commands.push(Command::ColorResidues {
            name: name.to_string(),
            residues,
            color,
        });
        Ok(())
    }
}

fn alignment_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_worked_example() {
    let file = alignment_file(">ref\nMK-V\n>s2\nMA-V\n");
    let mut renderer = RecordingRenderer::new("MKV");
    let config = MapperConfig::new("prot", "ref", file.path());
    let report = ConservationMapper::new(config, &mut renderer).run().unwrap();

    assert_eq!(report.total_residues, 3);
    assert_eq!(report.conserved_residues, 2);
    assert_eq!(
        report.residues.iter().map(|r| r.score).collect::<Vec<_>>(),
        [1, 2, 1]
    );
    let mapping = report.mapping.unwrap();
    assert_eq!(mapping.object, "prot_conservation_profile");
    assert_eq!(mapping.color_scheme, ColorScheme::Reds);

    let object = "prot_conservation_profile";
    assert_eq!(
        renderer.commands[..2],
        [
            Command::CloneObject {
                selection: "prot".to_string(),
                name: object.to_string(),
            },
            Command::ColorObject {
                name: object.to_string(),
                color: NEUTRAL_COLOR,
            },
        ]
    );
    let scheme = ColorScheme::Reds;
    assert_eq!(
        renderer.residue_colors(object, 3),
        [
            Some(scheme.color_for(1)),
            Some(scheme.color_for(2)),
            Some(scheme.color_for(1)),
        ]
    );
}

#[test]
fn test_saturating_colors() {
    // Column scores: 1, 4, 7.
    let file = alignment_file(
        ">ref\nAAA\n>b\nACC\n>c\nADD\n>d\nAEE\n>e\nA-F\n>f\nA-G\n>g\nA-H\n",
    );
    let mut renderer = RecordingRenderer::new("AAA");
    let config = MapperConfig::new("prot", "ref", file.path())
        .with_color_scheme(ColorScheme::GreenPurple);
    let report = ConservationMapper::new(config, &mut renderer).run().unwrap();
    assert_eq!(
        report.residues.iter().map(|r| r.score).collect::<Vec<_>>(),
        [1, 4, 7]
    );

    let colors = ColorScheme::GreenPurple.colors();
    assert_eq!(
        renderer.residue_colors("prot_conservation_profile", 3),
        [Some(colors[0]), Some(colors[3]), Some(colors[3])]
    );
    // Residues 2 and 3 share a color and are colored by a single command.
    assert!(renderer.commands.contains(&Command::ColorResidues {
        name: "prot_conservation_profile".to_string(),
        residues: ResidueSpec { first: 2, last: 3 },
        color: colors[3],
    }));
}

#[test]
fn test_sequence_mismatch_halts_before_mapping() {
    let file = alignment_file(">ref\nMKV\n>s2\nMKV\n");
    let mut renderer = RecordingRenderer::new("MKL");
    let config = MapperConfig::new("prot", "ref", file.path());
    let result = ConservationMapper::new(config, &mut renderer).run();

    match result {
        Err(Error::SequenceMismatch {
            reference,
            structure,
        }) => {
            assert_eq!(reference, "MKV");
            assert_eq!(structure, "MKL");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(renderer.commands.is_empty());
}

#[test]
fn test_missing_reference_halts_before_structure_access() {
    let file = alignment_file(">seqA\nMKV\n>seqB\nMKV\n");
    let mut renderer = RecordingRenderer::new("MKV");
    let config = MapperConfig::new("prot", "seqC", file.path());
    let result = ConservationMapper::new(config, &mut renderer).run();

    assert!(matches!(result, Err(Error::ReferenceNotFound { .. })));
    assert_eq!(renderer.sequence_requests, 0);
    assert!(renderer.commands.is_empty());
}

#[test]
fn test_missing_alignment_file() {
    let directory = tempfile::tempdir().unwrap();
    let mut renderer = RecordingRenderer::new("MKV");
    let config = MapperConfig::new("prot", "ref", directory.path().join("absent.fa"));
    let result = ConservationMapper::new(config, &mut renderer).run();

    assert!(matches!(result, Err(Error::AlignmentFileNotFound { .. })));
    assert_eq!(renderer.sequence_requests, 0);
}

#[test]
fn test_unequal_lengths_are_rejected() {
    let file = alignment_file(">ref\nMK-V\n>s2\nMKV\n");
    let mut renderer = RecordingRenderer::new("MKV");
    let config = MapperConfig::new("prot", "ref", file.path());
    let result = ConservationMapper::new(config, &mut renderer).run();
    assert!(matches!(result, Err(Error::AlignmentLengthMismatch { .. })));
}

#[test]
fn test_empty_profile_is_an_error() {
    let file = alignment_file(">ref\n--*\n>s2\nMKV\n");
    let mut renderer = RecordingRenderer::new("");
    let config = MapperConfig::new("prot", "ref", file.path());
    let result = ConservationMapper::new(config, &mut renderer).run();

    assert!(matches!(result, Err(Error::EmptyProfile)));
    assert!(renderer.commands.is_empty());
}

#[test]
fn test_repeated_runs_create_fresh_clones() {
    let file = alignment_file(">ref\nMKV\n>s2\nMRV\n");
    let mut renderer = RecordingRenderer::new("MKV");
    let config = MapperConfig::new("prot", "ref", file.path());
    let mut mapper = ConservationMapper::new(config, &mut renderer);
    mapper.run().unwrap();
    mapper.run().unwrap();

    let clones = renderer
        .commands
        .iter()
        .filter(|command| matches!(command, Command::CloneObject { .. }))
        .count();
    assert_eq!(clones, 2);
}
