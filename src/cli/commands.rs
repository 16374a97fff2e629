//! Command dispatch for the `sonora-tags` binary.
//!
//! This is the only place that prints. Every edit command follows one flow:
//! open the paths into an `Editor`, select everything, broadcast the edit,
//! report per-file results, then save (unless `--dry-run`).

use std::io::Write;
use std::sync::Arc;

use clap::Parser;

use super::CliError;
use super::args::{Cli, Commands};
use crate::config::Config;
use crate::core::{self, Editor, FileOutcome, Id3Codec, TagCodec, TagField};
use crate::logging;

pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    logging::init_logging(logging::effective_level(config.log_level()?, cli.verbose));

    let codec = Arc::new(Id3Codec::new(config.id3_version()?));
    let stdout = std::io::stdout();
    execute(cli, &config, codec, &mut stdout.lock())
}

/// Run one parsed command against `codec`, printing to `out`.
pub fn execute(
    cli: Cli,
    config: &Config,
    codec: Arc<dyn TagCodec>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let dry_run = cli.dry_run;

    match cli.command {
        Commands::Genres => {
            for g in core::genres::sorted_genres() {
                writeln!(out, "{g}")?;
            }
            Ok(())
        }
        Commands::Fields => {
            for field in TagField::ALL {
                let key = if field == TagField::Custom {
                    config.custom_tag.as_str()
                } else {
                    field.key()
                };
                writeln!(out, "{:<12} {key}", field.token())?;
            }
            Ok(())
        }
        Commands::Show { paths } => {
            let (editor, unopened) = open(config, codec, &paths, out)?;
            for (_, file) in editor.files() {
                writeln!(out, "{}", file.filename().display())?;
                for tag in file.tags() {
                    writeln!(out, "  {tag}")?;
                }
            }
            check(unopened)
        }
        Commands::List { sort, paths } => {
            let (mut editor, unopened) = open(config, codec, &paths, out)?;
            editor.sort_files(sort);
            for (_, file) in editor.files() {
                let track = file.track_number().map(|n| n.to_string()).unwrap_or_default();
                writeln!(
                    out,
                    "{track:>3}  {:<24}  {:<32}  {}",
                    file.artist().unwrap_or("-"),
                    file.title().unwrap_or("-"),
                    file.display_name()
                )?;
            }
            check(unopened)
        }
        Commands::Set { tag, value, paths } => {
            let (mut editor, unopened) = open(config, codec, &paths, out)?;
            let n = match TagField::from_token(&tag) {
                Some(field) => editor.set_field(field, &value),
                None => editor.set_value(&tag, &value),
            };
            log::info!("set {tag} on {n} files");
            finish(&mut editor, Vec::new(), unopened, dry_run, out)
        }
        Commands::Add { tag, value, paths } => {
            let (mut editor, unopened) = open(config, codec, &paths, out)?;
            let tag = resolve_key(&tag, config);
            let n = editor.add_value(&tag, &value);
            log::info!("added {tag} to {n} files");
            finish(&mut editor, Vec::new(), unopened, dry_run, out)
        }
        Commands::Update {
            tag,
            current,
            new,
            paths,
        } => {
            let (mut editor, unopened) = open(config, codec, &paths, out)?;
            let tag = resolve_key(&tag, config);
            let outcomes = editor.update_tag(&tag, &current, &new);
            finish(&mut editor, outcomes, unopened, dry_run, out)
        }
        Commands::Rename {
            tag,
            value,
            new_tag,
            paths,
        } => {
            let (mut editor, unopened) = open(config, codec, &paths, out)?;
            let (tag, new_tag) = (resolve_key(&tag, config), resolve_key(&new_tag, config));
            let outcomes = editor.rename_tag(&tag, &value, &new_tag);
            finish(&mut editor, outcomes, unopened, dry_run, out)
        }
        Commands::Remove { tag, value, paths } => {
            let (mut editor, unopened) = open(config, codec, &paths, out)?;
            let tag = resolve_key(&tag, config);
            let outcomes = editor.remove_tag(&tag, &value);
            finish(&mut editor, outcomes, unopened, dry_run, out)
        }
        Commands::Guess { pattern, paths } => {
            let (mut editor, unopened) = open(config, codec, &paths, out)?;
            let pattern = pattern.unwrap_or_else(|| config.default_pattern.clone());
            let guessed = editor.guess_tags_using_pattern(&pattern)?;

            let mut outcomes = Vec::with_capacity(guessed.len());
            for g in guessed {
                if let Ok(captures) = &g.result {
                    let shown: Vec<String> =
                        captures.iter().map(|(f, v)| format!("{f}={v}")).collect();
                    writeln!(out, "{}: {}", g.path.display(), shown.join(", "))?;
                }
                outcomes.push(FileOutcome {
                    id: g.id,
                    path: g.path,
                    result: g.result.map(|_| ()),
                });
            }
            finish(&mut editor, outcomes, unopened, dry_run, out)
        }
    }
}

/// Field names are accepted wherever a tag key is expected.
fn resolve_key(tag: &str, config: &Config) -> String {
    match TagField::from_token(tag) {
        Some(TagField::Custom) => config.custom_tag.clone(),
        Some(field) => field.key().to_string(),
        None => tag.to_string(),
    }
}

/// Open every MP3 under `paths` and select them all.
/// Files that can't be opened are printed; the count comes back with the editor.
fn open(
    config: &Config,
    codec: Arc<dyn TagCodec>,
    paths: &[std::path::PathBuf],
    out: &mut impl Write,
) -> Result<(Editor, usize), CliError> {
    let paths = core::scan_paths(paths)?;
    let mut editor = Editor::new(codec);
    editor.set_custom_tag(&config.custom_tag);

    let mut unopened = 0;
    for path in &paths {
        let end = editor.count_of_files();
        if let Err(e) = editor.try_add_file_at(path, end) {
            writeln!(out, "{}: {e}", path.display())?;
            unopened += 1;
        }
    }
    log::debug!("opened {} of {} files", editor.count_of_files(), paths.len());

    editor.select_all();
    Ok((editor, unopened))
}

fn check(failed: usize) -> Result<(), CliError> {
    if failed > 0 {
        return Err(CliError::Failed(failed));
    }
    Ok(())
}

/// Report edit failures, save, report save failures.
/// Files that never opened still count as failed.
fn finish(
    editor: &mut Editor,
    edits: Vec<FileOutcome>,
    unopened: usize,
    dry_run: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut failed = unopened + report(&edits, out)?;

    if dry_run {
        let pending = editor.files().filter(|(_, f)| f.dirty()).count();
        writeln!(out, "dry run: {pending} files would be saved")?;
    } else {
        let saved = editor.save_all();
        let ok = saved.iter().filter(|o| o.is_ok()).count();
        failed += report(&saved, out)?;
        writeln!(out, "saved {ok} files")?;
    }

    check(failed)
}

fn report(outcomes: &[FileOutcome], out: &mut impl Write) -> Result<usize, CliError> {
    let mut failed = 0;
    for o in outcomes {
        if let Err(e) = &o.result {
            writeln!(out, "{}: {e}", o.path.display())?;
            failed += 1;
        }
    }
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    fn blank_mp3(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; 1024]).unwrap();
        path
    }

    fn exec(args: &[&str]) -> (Result<(), CliError>, String) {
        let cli = Cli::try_parse_from(std::iter::once("sonora-tags").chain(args.iter().copied()))
            .unwrap();
        let mut out = Vec::new();
        let result = execute(cli, &Config::default(), Arc::new(Id3Codec::default()), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn read(path: &Path) -> Vec<core::Tag> {
        Id3Codec::default().read_tags(path).unwrap()
    }

    #[test]
    fn set_then_show() {
        let dir = TempDir::new().unwrap();
        let a = blank_mp3(dir.path(), "01 - Intro.mp3");
        let dir_arg = dir.path().to_str().unwrap();

        let (result, out) = exec(&["set", "album", "Moon Safari", dir_arg]);
        result.unwrap();
        assert!(out.contains("saved 1 files"));
        assert_eq!(read(&a), vec![core::Tag::new("ALBUM", "Moon Safari")]);

        let (result, out) = exec(&["show", a.to_str().unwrap()]);
        result.unwrap();
        assert!(out.contains("  ALBUM=Moon Safari"));
    }

    #[test]
    fn guess_with_default_pattern() {
        let dir = TempDir::new().unwrap();
        let a = blank_mp3(dir.path(), "07 - Playground Love.mp3");

        let (result, out) = exec(&["guess", a.to_str().unwrap()]);
        result.unwrap();
        assert!(out.contains("trackNumber=7, title=Playground Love"));

        let tags = read(&a);
        assert!(tags.contains(&core::Tag::new("TITLE", "Playground Love")));
        assert!(tags.contains(&core::Tag::new("TRACKNUMBER", "7")));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let a = blank_mp3(dir.path(), "x.mp3");

        let (result, out) = exec(&["-n", "set", "TITLE", "x", a.to_str().unwrap()]);
        result.unwrap();
        assert!(out.contains("dry run: 1 files would be saved"));
        assert!(read(&a).is_empty());
    }

    #[test]
    fn per_file_failures_fail_the_command_but_save_the_rest() {
        let dir = TempDir::new().unwrap();
        let a = blank_mp3(dir.path(), "a.mp3");
        let b = blank_mp3(dir.path(), "b.mp3");
        exec(&["set", "GENRE", "Rock", a.to_str().unwrap()]).0.unwrap();

        let (result, out) = exec(&["update", "genre", "Rock", "Pop", dir.path().to_str().unwrap()]);
        assert!(matches!(result, Err(CliError::Failed(1))));
        assert!(out.contains("b.mp3: No tag GENRE"));
        assert_eq!(read(&a), vec![core::Tag::new("GENRE", "Pop")]);
        assert!(read(&b).is_empty());
    }

    #[test]
    fn list_sorts_by_track() {
        let dir = TempDir::new().unwrap();
        let a = blank_mp3(dir.path(), "a.mp3");
        let b = blank_mp3(dir.path(), "b.mp3");
        exec(&["set", "trackNumber", "2", a.to_str().unwrap()]).0.unwrap();
        exec(&["set", "trackNumber", "1", b.to_str().unwrap()]).0.unwrap();

        let (result, out) = exec(&["list", "--sort", "track", dir.path().to_str().unwrap()]);
        result.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("b.mp3"));
        assert!(lines[1].ends_with("a.mp3"));
    }

    #[test]
    fn files_that_fail_to_open_fail_the_command() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"hello").unwrap();
        let a = blank_mp3(dir.path(), "a.mp3");

        let (result, out) = exec(&["show", notes.to_str().unwrap()]);
        assert!(matches!(result, Err(CliError::Failed(1))));
        assert!(out.contains("notes.txt: Could not read"));

        // The files that did open are still edited and saved.
        let (result, out) = exec(&[
            "set",
            "TITLE",
            "x",
            notes.to_str().unwrap(),
            a.to_str().unwrap(),
        ]);
        assert!(matches!(result, Err(CliError::Failed(1))));
        assert!(out.contains("saved 1 files"));
        assert_eq!(read(&a), vec![core::Tag::new("TITLE", "x")]);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let dir = TempDir::new().unwrap();
        let a = blank_mp3(dir.path(), "a.mp3");
        let (result, _) = exec(&["guess", "-p", "[nope]", a.to_str().unwrap()]);
        assert!(matches!(result, Err(CliError::Tag(core::TagError::InvalidPattern(_)))));
    }

    #[test]
    fn genres_and_fields_need_no_files() {
        let (result, out) = exec(&["genres"]);
        result.unwrap();
        assert_eq!(out.lines().count(), 80);
        assert!(out.lines().any(|l| l == "Rock"));

        let (result, out) = exec(&["fields"]);
        result.unwrap();
        assert!(out.lines().any(|l| l.starts_with("trackNumber") && l.ends_with("TRACKNUMBER")));
    }
}
