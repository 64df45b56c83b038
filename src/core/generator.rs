//! The setup.py generation pipeline.
//!
//! Resolution happens before any output is touched: a missing version or a
//! broken descriptor leaves an existing `setup.py` as it was.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::descriptor::ProjectDescriptor;
use crate::error::{Error, Result};
use crate::paths;
use crate::utils::io;
use crate::utils::template::{self, TemplateVars};
use crate::version::to_python_version;

pub const OVERWRITE_NOTICE: &str = "Overwriting current setup.py file";

/// Where the package name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSource {
    Explicit(String),
    Descriptor(PathBuf),
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub source: NameSource,
    pub version: Option<String>,
    pub output_dir: PathBuf,
    /// Overrides the template shipped next to the binary.
    pub template: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub package: PackageInfo,
    pub template_path: String,
    pub output_path: String,
    pub overwritten: bool,
    pub dry_run: bool,
}

/// Resolve name and version from flags, falling back to the descriptor.
///
/// A descriptor without `artifactId` yields an empty name. A descriptor
/// without `version` is an error. Only descriptor versions get the snapshot
/// rewrite; an explicit version is taken as given.
pub fn resolve_package(source: &NameSource, version: Option<&str>) -> Result<PackageInfo> {
    let (name, descriptor) = match source {
        NameSource::Explicit(name) => (name.clone(), None),
        NameSource::Descriptor(path) => {
            let pom = ProjectDescriptor::load(path)?;
            (descriptor_name(&pom), Some(pom))
        }
    };

    let version = match (version, &descriptor) {
        (Some(version), _) => version.to_string(),
        (None, Some(pom)) => {
            let raw = pom.version().ok_or_else(|| {
                Error::descriptor_missing_field(
                    pom.path.display().to_string(),
                    crate::descriptor::VERSION,
                )
            })?;
            to_python_version(raw)
        }
        (None, None) => {
            return Err(
                Error::validation_missing_argument(vec!["--version".to_string()]).with_hint(
                    "Pass --version, or use --pom to read it from a project descriptor",
                ),
            );
        }
    };

    Ok(PackageInfo { name, version })
}

fn descriptor_name(pom: &ProjectDescriptor) -> String {
    match pom.artifact_id() {
        Some(name) => name.to_string(),
        None => {
            crate::log_status!(
                "setup",
                "{} has no artifactId; package name will be empty",
                pom.path.display()
            );
            String::new()
        }
    }
}

pub fn render_setup(template_text: &str, package: &PackageInfo) -> Result<String> {
    template::render(
        template_text,
        &[
            (TemplateVars::PACKAGE_NAME, package.name.as_str()),
            (TemplateVars::PACKAGE_VERSION, package.version.as_str()),
        ],
    )
}

/// Run the full pipeline, writing notices (or the dry-run rendering) to `out`.
pub fn generate<W: Write>(options: &GenerateOptions, out: &mut W) -> Result<GenerateOutput> {
    let package = resolve_package(&options.source, options.version.as_deref())?;

    let template_path = paths::template_path(options.template.as_deref())?;
    let template_text = io::read_file(&template_path, "read setup.py template")?;
    let rendered = render_setup(&template_text, &package)?;

    let output_path = paths::output_path(&options.output_dir)?;

    if options.dry_run {
        write_stdout(out, &rendered)?;
        return Ok(build_output(package, &template_path, &output_path, false, true));
    }

    let overwritten = output_path.exists();
    if overwritten {
        write_stdout(out, &format!("{}\n", OVERWRITE_NOTICE))?;
    }

    io::write_file(&output_path, &rendered, "write setup.py")?;
    crate::log_status!(
        "setup",
        "Wrote {} ({} {})",
        output_path.display(),
        package.name,
        package.version
    );

    Ok(build_output(
        package,
        &template_path,
        &output_path,
        overwritten,
        false,
    ))
}

fn build_output(
    package: PackageInfo,
    template_path: &Path,
    output_path: &Path,
    overwritten: bool,
    dry_run: bool,
) -> GenerateOutput {
    GenerateOutput {
        package,
        template_path: template_path.display().to_string(),
        output_path: output_path.display().to_string(),
        overwritten,
        dry_run,
    }
}

fn write_stdout<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| Error::internal_io(e.to_string(), Some("write stdout".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "setup(name='{PACKAGE_NAME}', version='{PACKAGE_VERSION}')\n";

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join(paths::TEMPLATE_FILE_NAME), TEMPLATE).unwrap();
            fs::create_dir(dir.path().join("out")).unwrap();
            Self { dir }
        }

        fn pom(&self, body: &str) -> PathBuf {
            let path = self.dir.path().join("pom.xml");
            fs::write(
                &path,
                format!(
                    "<project xmlns=\"http://maven.apache.org/POM/4.0.0\">{}</project>",
                    body
                ),
            )
            .unwrap();
            path
        }

        fn options(&self, source: NameSource, version: Option<&str>) -> GenerateOptions {
            GenerateOptions {
                source,
                version: version.map(str::to_string),
                output_dir: self.dir.path().join("out"),
                template: Some(self.dir.path().join(paths::TEMPLATE_FILE_NAME)),
                dry_run: false,
            }
        }

        fn setup_py(&self) -> PathBuf {
            self.dir.path().join("out").join(paths::OUTPUT_FILE_NAME)
        }
    }

    fn run(options: &GenerateOptions) -> (Result<GenerateOutput>, String) {
        let mut stdout = Vec::new();
        let result = generate(options, &mut stdout);
        (result, String::from_utf8(stdout).unwrap())
    }

    #[test]
    fn explicit_name_and_version_are_used_verbatim() {
        let fx = Fixture::new();
        let options = fx.options(
            NameSource::Explicit("my-pkg".to_string()),
            Some("3.0-SNAPSHOT"),
        );

        let (result, stdout) = run(&options);
        let output = result.unwrap();

        assert_eq!(
            fs::read_to_string(fx.setup_py()).unwrap(),
            "setup(name='my-pkg', version='3.0-SNAPSHOT')\n"
        );
        assert!(!output.overwritten);
        assert!(stdout.is_empty());
    }

    #[test]
    fn descriptor_supplies_name_and_version() {
        let fx = Fixture::new();
        let pom = fx.pom("<artifactId>widget</artifactId><version>1.0.0</version>");

        let package = resolve_package(&NameSource::Descriptor(pom), None).unwrap();
        assert_eq!(
            package,
            PackageInfo {
                name: "widget".to_string(),
                version: "1.0.0".to_string()
            }
        );
    }

    #[test]
    fn descriptor_snapshot_is_rewritten() {
        let fx = Fixture::new();
        let pom = fx.pom("<artifactId>widget</artifactId><version>2.3.1-SNAPSHOT</version>");

        let (result, _) = run(&fx.options(NameSource::Descriptor(pom), None));
        assert_eq!(result.unwrap().package.version, "2.3.1.preview");
        assert_eq!(
            fs::read_to_string(fx.setup_py()).unwrap(),
            "setup(name='widget', version='2.3.1.preview')\n"
        );
    }

    #[test]
    fn explicit_version_overrides_descriptor() {
        let fx = Fixture::new();
        let pom = fx.pom("<artifactId>widget</artifactId><version>2.3.1-SNAPSHOT</version>");

        let package = resolve_package(&NameSource::Descriptor(pom), Some("5.0")).unwrap();
        assert_eq!(package.name, "widget");
        assert_eq!(package.version, "5.0");
    }

    #[test]
    fn missing_artifact_id_embeds_empty_name() {
        let fx = Fixture::new();
        let pom = fx.pom("<version>1.0.0</version>");

        let (result, _) = run(&fx.options(NameSource::Descriptor(pom), None));
        assert_eq!(result.unwrap().package.name, "");
        assert_eq!(
            fs::read_to_string(fx.setup_py()).unwrap(),
            "setup(name='', version='1.0.0')\n"
        );
    }

    #[test]
    fn missing_version_fails_without_writing() {
        let fx = Fixture::new();
        fs::write(fx.setup_py(), "previous").unwrap();
        let pom = fx.pom("<artifactId>widget</artifactId>");

        let (result, stdout) = run(&fx.options(NameSource::Descriptor(pom), None));
        let err = result.unwrap_err();

        assert_eq!(err.code.as_str(), "descriptor.missing_field");
        assert_eq!(err.details["field"], "version");
        assert_eq!(fs::read_to_string(fx.setup_py()).unwrap(), "previous");
        assert!(stdout.is_empty());
    }

    #[test]
    fn explicit_name_without_version_is_rejected_before_io() {
        let fx = Fixture::new();
        let mut options = fx.options(NameSource::Explicit("widget".to_string()), None);
        options.template = Some(fx.dir.path().join("does-not-exist"));

        let (result, _) = run(&options);
        assert_eq!(
            result.unwrap_err().code.as_str(),
            "validation.missing_argument"
        );
        assert!(!fx.setup_py().exists());
    }

    #[test]
    fn malformed_descriptor_is_a_parse_error() {
        let fx = Fixture::new();
        let path = fx.dir.path().join("pom.xml");
        fs::write(&path, "<project><artifactId>widget</project>").unwrap();

        let (result, _) = run(&fx.options(NameSource::Descriptor(path), None));
        assert_eq!(result.unwrap_err().code.as_str(), "descriptor.parse_failed");
        assert!(!fx.setup_py().exists());
    }

    #[test]
    fn rerun_overwrites_and_announces_once_per_run() {
        let fx = Fixture::new();

        let (first, first_stdout) = run(&fx.options(
            NameSource::Explicit("first".to_string()),
            Some("1"),
        ));
        assert!(!first.unwrap().overwritten);
        assert!(first_stdout.is_empty());

        let (second, second_stdout) = run(&fx.options(
            NameSource::Explicit("second".to_string()),
            Some("2"),
        ));
        assert!(second.unwrap().overwritten);
        assert_eq!(second_stdout.matches(OVERWRITE_NOTICE).count(), 1);
        assert_eq!(
            fs::read_to_string(fx.setup_py()).unwrap(),
            "setup(name='second', version='2')\n"
        );
    }

    #[test]
    fn missing_template_is_an_io_error() {
        let fx = Fixture::new();
        let mut options = fx.options(NameSource::Explicit("widget".to_string()), Some("1"));
        options.template = Some(fx.dir.path().join("missing.template"));

        let (result, _) = run(&options);
        assert_eq!(result.unwrap_err().code.as_str(), "internal.io_error");
        assert!(!fx.setup_py().exists());
    }

    #[test]
    fn dry_run_prints_instead_of_writing() {
        let fx = Fixture::new();
        fs::write(fx.setup_py(), "previous").unwrap();
        let mut options = fx.options(NameSource::Explicit("widget".to_string()), Some("1"));
        options.dry_run = true;

        let (result, stdout) = run(&options);
        let output = result.unwrap();

        assert!(output.dry_run);
        assert_eq!(stdout, "setup(name='widget', version='1')\n");
        assert_eq!(fs::read_to_string(fx.setup_py()).unwrap(), "previous");
    }
}
