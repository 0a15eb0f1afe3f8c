//! Message tables for the two supported locales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::RoadmapStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bg,
    #[default]
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Bg => "bg",
            Language::En => "en",
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Language::Bg => &BG,
            Language::En => &EN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bg" => Ok(Language::Bg),
            "en" => Ok(Language::En),
            _ => Err(format!("Invalid language '{}'. Must be one of: bg, en", s)),
        }
    }
}

pub struct Messages {
    pub suggestions: &'static str,
    pub share_ideas: &'static str,
    pub most_voted: &'static str,
    pub most_recent: &'static str,
    pub no_suggestions: &'static str,
    pub loading_suggestions: &'static str,
    pub loading_more: &'static str,
    pub no_more_suggestions: &'static str,
    pub minutes_ago: fn(i64) -> String,
    pub hours_ago: fn(i64) -> String,
    pub days_ago: fn(i64) -> String,
    pub votes: fn(i64) -> String,
    pub submit_form_title: &'static str,
    pub error_title: &'static str,
    pub no_project_selected: &'static str,
    pub toast_vote_success: &'static str,
    pub toast_vote_removed: &'static str,
    pub toast_vote_error: &'static str,
    pub toast_vote_pending: &'static str,
    pub toast_suggestion_success: &'static str,
    pub toast_suggestion_error: &'static str,
    pub settings_title: &'static str,
    pub appearance: &'static str,
    pub theme: &'static str,
    pub theme_light: &'static str,
    pub theme_dark: &'static str,
    pub theme_system: &'static str,
    pub language: &'static str,
    pub language_bulgarian: &'static str,
    pub language_english: &'static str,
    pub user_info: &'static str,
    pub username: &'static str,
    pub anonymous: &'static str,
    pub project_info: &'static str,
    pub project_name: &'static str,
    pub roadmap: &'static str,
    pub roadmap_description: &'static str,
    pub status_all: &'static str,
    pub status_planned: &'static str,
    pub status_todo: &'static str,
    pub status_doing: &'static str,
    pub status_done: &'static str,
    pub no_roadmap_items: &'static str,
    pub back_to_suggestions: &'static str,
    pub view_roadmap: &'static str,
}

impl Messages {
    pub fn status_label(&self, status: RoadmapStatus) -> &'static str {
        match status {
            RoadmapStatus::Planned => self.status_planned,
            RoadmapStatus::Todo => self.status_todo,
            RoadmapStatus::Doing => self.status_doing,
            RoadmapStatus::Done => self.status_done,
        }
    }
}

/// "5 minutes ago" style age, in minutes under an hour, hours under a day,
/// days after that.
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>, messages: &Messages) -> String {
    let minutes = now.signed_duration_since(created_at).num_minutes().max(0);
    if minutes < 60 {
        (messages.minutes_ago)(minutes)
    } else if minutes < 1440 {
        (messages.hours_ago)(minutes / 60)
    } else {
        (messages.days_ago)(minutes / 1440)
    }
}

fn en_plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

fn bg_plural(count: i64, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

pub static EN: Messages = Messages {
    suggestions: "Suggestions",
    share_ideas: "Share your ideas and vote on suggestions from the community",
    most_voted: "Most Voted",
    most_recent: "Most Recent",
    no_suggestions: "No suggestions yet. Be the first to submit one!",
    loading_suggestions: "Loading suggestions...",
    loading_more: "Loading more...",
    no_more_suggestions: "No more suggestions",
    minutes_ago: |n| format!("{} ago", en_plural(n, "minute")),
    hours_ago: |n| format!("{} ago", en_plural(n, "hour")),
    days_ago: |n| format!("{} ago", en_plural(n, "day")),
    votes: |n| en_plural(n, "vote"),
    submit_form_title: "Submit a Suggestion",
    error_title: "Something went wrong",
    no_project_selected: "No project selected. Please contact the administrator.",
    toast_vote_success: "Your vote was recorded successfully",
    toast_vote_removed: "Your vote was removed",
    toast_vote_error: "Error voting. Please try again.",
    toast_vote_pending: "Your previous vote is still being saved",
    toast_suggestion_success: "Suggestion submitted successfully",
    toast_suggestion_error: "Error submitting suggestion. Please try again.",
    settings_title: "Settings",
    appearance: "Appearance",
    theme: "Theme",
    theme_light: "Light",
    theme_dark: "Dark",
    theme_system: "System",
    language: "Language",
    language_bulgarian: "Български",
    language_english: "English",
    user_info: "User Information",
    username: "Username",
    anonymous: "Anonymous",
    project_info: "Project Information",
    project_name: "Project Name",
    roadmap: "Roadmap",
    roadmap_description: "See what we're planning and working on",
    status_all: "All",
    status_planned: "Planned",
    status_todo: "To Do",
    status_doing: "In Progress",
    status_done: "Done",
    no_roadmap_items: "No roadmap items yet",
    back_to_suggestions: "Back to Suggestions",
    view_roadmap: "View Roadmap",
};

pub static BG: Messages = Messages {
    suggestions: "Предложения",
    share_ideas: "Споделете вашите идеи и гласувайте за предложения от общността",
    most_voted: "Най-гласувани",
    most_recent: "Най-нови",
    no_suggestions: "Все още няма предложения. Бъдете първият, който ще изпрати такова!",
    loading_suggestions: "Зареждане на предложения...",
    loading_more: "Зареждане на още...",
    no_more_suggestions: "Няма повече предложения",
    minutes_ago: |n| format!("преди {}", bg_plural(n, "минута", "минути")),
    hours_ago: |n| format!("преди {}", bg_plural(n, "час", "часа")),
    days_ago: |n| format!("преди {}", bg_plural(n, "ден", "дни")),
    votes: |n| bg_plural(n, "глас", "гласа"),
    submit_form_title: "Изпратете предложение",
    error_title: "Нещо се обърка",
    no_project_selected: "Не е избран проект. Моля, свържете се с администратора.",
    toast_vote_success: "Гласът ви беше записан успешно",
    toast_vote_removed: "Гласът ви беше премахнат",
    toast_vote_error: "Грешка при гласуване. Моля, опитайте отново.",
    toast_vote_pending: "Предишният ви глас все още се записва",
    toast_suggestion_success: "Предложението беше изпратено успешно",
    toast_suggestion_error: "Грешка при изпращане на предложението. Моля, опитайте отново.",
    settings_title: "Настройки",
    appearance: "Външен вид",
    theme: "Тема",
    theme_light: "Светла",
    theme_dark: "Тъмна",
    theme_system: "Системна",
    language: "Език",
    language_bulgarian: "Български",
    language_english: "English",
    user_info: "Потребителска информация",
    username: "Потребителско име",
    anonymous: "Анонимен",
    project_info: "Информация за проекта",
    project_name: "Име на проекта",
    roadmap: "Пътна карта",
    roadmap_description: "Вижте какво планираме и какво разработваме",
    status_all: "Всички",
    status_planned: "Планирано",
    status_todo: "За изпълнение",
    status_doing: "В процес",
    status_done: "Завършено",
    no_roadmap_items: "Все още няма елементи в пътната карта",
    back_to_suggestions: "Обратно към предложенията",
    view_roadmap: "Виж пътната карта",
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_english_plurals() {
        assert_eq!((EN.votes)(1), "1 vote");
        assert_eq!((EN.votes)(0), "0 votes");
        assert_eq!((EN.votes)(-3), "-3 votes");
        assert_eq!((EN.minutes_ago)(1), "1 minute ago");
        assert_eq!((EN.days_ago)(4), "4 days ago");
    }

    #[test]
    fn test_bulgarian_plurals() {
        assert_eq!((BG.votes)(1), "1 глас");
        assert_eq!((BG.votes)(7), "7 гласа");
        assert_eq!((BG.hours_ago)(2), "преди 2 часа");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now - Duration::minutes(59), now, &EN), "59 minutes ago");
        assert_eq!(format_time_ago(now - Duration::minutes(60), now, &EN), "1 hour ago");
        assert_eq!(format_time_ago(now - Duration::minutes(1439), now, &EN), "23 hours ago");
        assert_eq!(format_time_ago(now - Duration::minutes(1440), now, &EN), "1 day ago");
    }

    #[test]
    fn test_future_timestamp_clamps_to_zero() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now + Duration::minutes(5), now, &EN), "0 minutes ago");
    }

    #[test]
    fn test_language_selects_table() {
        assert_eq!(Language::Bg.messages().roadmap, "Пътна карта");
        assert_eq!(Language::En.messages().roadmap, "Roadmap");
        assert_eq!(Language::default(), Language::En);
        assert_eq!("bg".parse::<Language>(), Ok(Language::Bg));
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(EN.status_label(RoadmapStatus::Doing), "In Progress");
        assert_eq!(BG.status_label(RoadmapStatus::Done), "Завършено");
    }
}
