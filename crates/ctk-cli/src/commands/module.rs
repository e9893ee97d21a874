use anyhow::Context;
use ctk_config::ModuleConfig;
use ctk_module::ModuleGenerator;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ModuleArgs;
use crate::commands::Outcome;
use crate::output::{Output, emit};
use crate::ui::UiPrefs;

/// Handle `ctk module`.
pub fn handle(
    args: &ModuleArgs,
    mut config: ModuleConfig,
    flags: &GlobalFlags,
    prefs: UiPrefs,
) -> anyhow::Result<Outcome> {
    apply_overrides(&mut config, args);
    let generator = ModuleGenerator::new(config);
    let pattern = args.pattern.as_deref();
    let report = if args.destroy {
        generator
            .destroy(&args.name, pattern)
            .with_context(|| format!("failed to destroy module {}", args.name))?
    } else {
        generator
            .generate(&args.name, pattern)
            .with_context(|| format!("failed to generate module {}", args.name))?
    };

    emit(
        &Output {
            report: &report,
            rows: &report.files,
            text: report.render_text(),
        },
        flags.format,
        prefs,
    )?;
    Ok(Outcome::Success)
}

/// Command-line directories and `--update-svn` win over configuration.
pub fn apply_overrides(config: &mut ModuleConfig, args: &ModuleArgs) {
    if let Some(src) = &args.src {
        config.path_src.clone_from(src);
    }
    if args.inc.is_some() {
        config.path_inc.clone_from(&args.inc);
    }
    if let Some(tst) = &args.tst {
        config.path_tst.clone_from(tst);
    }
    config.update_svn |= args.update_svn;
}
