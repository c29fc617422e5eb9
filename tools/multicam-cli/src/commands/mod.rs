pub mod generate;
pub mod info;
pub mod init_config;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use multicam_clip_source::SqliteClipSource;
use multicam_common::config::{config_file_path, AppConfig};
use multicam_common::error::MulticamError;
use multicam_timecode::{FrameRate, SmpteConverter};
use multicam_xml_export::{AssemblyContext, ClipTemplate, SequenceTemplate};

/// Options shared by every command that reads the clip database.
/// Each flag overrides the matching configuration field.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Configuration file (defaults to the standard config location)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SQLite database holding the clip table
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Table with one row per recorded clip
    #[arg(long)]
    pub table: Option<String>,

    /// Timeline framerate: 23.976, 24, 25, 29.97, 30, 50, 59.94, 60, ...
    #[arg(short, long)]
    pub framerate: Option<String>,

    /// Output XML file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base document template containing the sequence
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Clip fragment template rooted at clipitem
    #[arg(long)]
    pub clip_template: Option<PathBuf>,
}

/// Configuration after flags are applied, with the reason the standard
/// config file was ignored, if it was.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub config: AppConfig,
    pub fallback: Option<MulticamError>,
}

impl SourceArgs {
    /// Load the configuration and apply the flags on top of it.
    pub fn resolve(&self) -> anyhow::Result<ResolvedConfig> {
        self.resolve_with(&config_file_path())
    }

    /// `default_path` is read when no `--config` is given. A broken file
    /// there is skipped and reported in [`ResolvedConfig::fallback`].
    fn resolve_with(&self, default_path: &Path) -> anyhow::Result<ResolvedConfig> {
        let (mut config, fallback) = match &self.config {
            Some(path) => {
                let config = AppConfig::load_from(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                (config, None)
            }
            None => AppConfig::load_or_default(default_path),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(ResolvedConfig { config, fallback })
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(database) = &self.database {
            config.source.database = database.clone();
        }
        if let Some(table) = &self.table {
            config.source.table = table.clone();
        }
        if let Some(framerate) = &self.framerate {
            config.framerate = framerate.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(template) = &self.template {
            config.templates.sequence = Some(template.clone());
        }
        if let Some(clip_template) = &self.clip_template {
            config.templates.clip = Some(clip_template.clone());
        }
    }
}

/// Templates, converter and database opened from one configuration.
pub struct Pipeline {
    pub rate: FrameRate,
    pub converter: SmpteConverter,
    pub sequence: SequenceTemplate,
    pub clip: ClipTemplate,
    pub source: SqliteClipSource,
}

impl Pipeline {
    /// Templates are loaded and checked before the database is opened.
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let rate: FrameRate = config
            .framerate
            .parse()
            .map_err(|e| MulticamError::config(format!("framerate {:?}: {e}", config.framerate)))?;

        let sequence = match &config.templates.sequence {
            Some(path) => SequenceTemplate::load(path)?,
            None => SequenceTemplate::builtin()?,
        }
        .with_frame_rate(rate);
        let clip = match &config.templates.clip {
            Some(path) => ClipTemplate::load(path)?,
            None => ClipTemplate::builtin()?,
        }
        .with_frame_rate(rate);

        let source = SqliteClipSource::open(&config.source.database, &config.source.table)
            .map_err(|e| MulticamError::source(e.to_string()))?;

        tracing::debug!(
            database = %config.source.database.display(),
            table = %config.source.table,
            framerate = %rate,
            "Pipeline ready"
        );

        Ok(Self {
            rate,
            converter: SmpteConverter::new(rate),
            sequence,
            clip,
            source,
        })
    }

    pub fn context(&self) -> AssemblyContext<'_> {
        AssemblyContext::new(&self.source, &self.converter, &self.sequence, &self.clip)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn write_clip_db(path: &Path) {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE tracks (id INTEGER PRIMARY KEY, cam_id INTEGER, tc TEXT,
                duration INTEGER, fir_f INTEGER, last_f INTEGER, fullpath TEXT);
             INSERT INTO tracks VALUES (1, 1, '10:00:04:00', 60, 100, 160, '/media/cam1/a.mov');
             INSERT INTO tracks VALUES (2, 1, '10:00:08:00', 60, 200, 260, '/media/cam1/b.mov');
             INSERT INTO tracks VALUES (3, 2, '10:00:06:00', 60, 150, 210, '/media/cam2/c.mov');",
        )
        .unwrap();
    }

    pub(crate) fn config_for(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.source.database = dir.join("clips.db");
        config.output = dir.join("timeline.xml");
        config
    }

    #[test]
    fn test_flags_override_config() {
        let args = SourceArgs {
            database: Some(PathBuf::from("other.db")),
            framerate: Some("29.97".to_string()),
            clip_template: Some(PathBuf::from("clip.xml")),
            ..Default::default()
        };
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.source.database, PathBuf::from("other.db"));
        assert_eq!(config.source.table, "tracks");
        assert_eq!(config.framerate, "29.97");
        assert_eq!(config.templates.clip, Some(PathBuf::from("clip.xml")));
        assert!(config.templates.sequence.is_none());
    }

    #[test]
    fn test_explicit_config_file_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let args = SourceArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_broken_default_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "framerate": 29.97, "#).unwrap();
        let args = SourceArgs {
            database: Some(PathBuf::from("other.db")),
            ..Default::default()
        };

        let resolved = args.resolve_with(&path).unwrap();
        assert_eq!(resolved.config.source.database, PathBuf::from("other.db"));
        assert_eq!(resolved.config.framerate, "25");
        let fallback = resolved.fallback.unwrap().to_string();
        assert!(fallback.contains("Failed to load config"), "{fallback}");
    }

    #[test]
    fn test_missing_default_config_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = SourceArgs::default()
            .resolve_with(&dir.path().join("config.json"))
            .unwrap();
        assert!(resolved.fallback.is_none());
        assert_eq!(resolved.config, AppConfig::default());
    }

    #[test]
    fn test_template_checked_before_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        config.templates.clip = Some(dir.path().join("missing.xml"));

        let err = Pipeline::open(&config).err().unwrap();
        let err = err.downcast::<MulticamError>().unwrap();
        assert!(matches!(err, MulticamError::FileNotFound { .. }));
    }

    #[test]
    fn test_unknown_framerate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        config.framerate = "twenty".to_string();
        assert!(Pipeline::open(&config).is_err());
    }

    #[test]
    fn test_open_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        write_clip_db(&config.source.database);

        let pipeline = Pipeline::open(&config).unwrap();
        assert_eq!(pipeline.rate, FrameRate::Integer(25));
        let report = pipeline
            .context()
            .assemble(multicam_xml_export::RunId::generate())
            .unwrap()
            .report;
        assert_eq!(report.clip_count(), 3);
    }
}
