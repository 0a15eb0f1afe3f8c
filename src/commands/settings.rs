use anyhow::Result;

use crate::i18n::Language;
use crate::settings::{Settings, Theme};

pub fn show(settings: &Settings, project: &str) -> Result<()> {
    let messages = settings.messages();
    let language = match settings.language {
        Language::Bg => messages.language_bulgarian,
        Language::En => messages.language_english,
    };

    println!("{}", messages.settings_title);
    println!();
    println!("{}", messages.appearance);
    println!("  {}: {}", messages.theme, settings.theme.label(messages));
    println!("  {}: {}", messages.language, language);
    println!();
    println!("{}", messages.user_info);
    println!("  {}: {}", messages.username, settings.display_voter());
    println!();
    println!("{}", messages.project_info);
    println!("  {}: {}", messages.project_name, project);
    Ok(())
}

pub fn set_language(settings: &mut Settings, language: Language) -> Result<()> {
    settings.language = language;
    println!("{}: {}", settings.messages().language, language);
    Ok(())
}

pub fn set_theme(settings: &mut Settings, theme: Theme) -> Result<()> {
    settings.theme = theme;
    let messages = settings.messages();
    println!("{}: {}", messages.theme, theme.label(messages));
    Ok(())
}

/// Forget the voter identity. The next vote creates a fresh one, so earlier
/// votes can no longer be toggled from this client.
pub fn reset_voter(settings: &mut Settings) -> Result<()> {
    settings.reset_voter();
    let messages = settings.messages();
    println!("{}: {}", messages.username, settings.display_voter());
    Ok(())
}
