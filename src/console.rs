use chrono::{DateTime, Utc};
use feed_service::{FeedRenderer, NavigationEvent};
use heronews_core::{CommentNode, CoreError, FeedCategory, FreshStory, Item, Thread};
use std::io::Write;
use std::sync::Mutex;

/// Line commands accepted on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Navigate(NavigationEvent),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, CoreError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(CoreError::InvalidInput {
            message: "empty command".to_string(),
        });
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "more" | "m" => Command::Navigate(NavigationEvent::LoadMore),
        "open" | "o" => {
            let id = words
                .next()
                .and_then(|raw| raw.parse().ok())
                .ok_or_else(|| CoreError::InvalidInput {
                    message: "usage: open <item id>".to_string(),
                })?;
            Command::Navigate(NavigationEvent::OpenThread(id))
        }
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Navigate(NavigationEvent::CategoryChanged(other.parse()?)),
    };

    Ok(command)
}

pub fn print_help() {
    println!("Commands: stories | jobs | polls | more | open <id> | help | quit");
}

/// Writes feeds and threads to stdout.
#[derive(Default)]
pub struct ConsoleRenderer {
    // Running index so appended pages continue the numbering
    shown: Mutex<usize>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedRenderer for ConsoleRenderer {
    fn show_feed(&self, category: FeedCategory, items: &[Item], replace: bool) {
        let mut shown = self.shown.lock().unwrap_or_else(|p| p.into_inner());
        let mut out = std::io::stdout().lock();

        if replace {
            *shown = 0;
            let _ = writeln!(out, "\n== {} ==", category);
        }
        if items.is_empty() && *shown == 0 {
            let _ = writeln!(out, "  (nothing here)");
        }

        let now = Utc::now();
        for item in items {
            *shown += 1;
            let _ = writeln!(out, "{:>3}. {}", *shown, format_story(item, now));
        }
    }

    fn set_more_available(&self, more: bool) {
        if more {
            println!("  -- type 'more' for the next page --");
        }
    }

    fn show_thread(&self, thread: &Thread) {
        let mut out = std::io::stdout().lock();
        let now = Utc::now();

        let _ = writeln!(out, "\n{}", format_story(&thread.root, now));
        if let Some(text) = &thread.root.text {
            let _ = writeln!(out, "{}", text);
        }
        let _ = writeln!(out, "-- {} comments --", thread.comment_count());

        for node in &thread.comments {
            write_comment(&mut out, node, 0, now);
        }
    }

    fn notify_fresh(&self, story: &FreshStory) {
        println!("\n* New story: {} by {}", story.title, story.author);
    }
}

fn write_comment(out: &mut impl Write, node: &CommentNode, depth: usize, now: DateTime<Utc>) {
    let indent = "  ".repeat(depth + 1);
    let _ = writeln!(
        out,
        "{}{} ({})",
        indent,
        node.comment.author(),
        format_age(node.comment.created_at(), now)
    );
    if let Some(text) = &node.comment.text {
        let _ = writeln!(out, "{}  {}", indent, text);
    }
    for child in &node.children {
        write_comment(out, child, depth + 1, now);
    }
}

fn format_story(item: &Item, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{} [{}] by {} ({})",
        item.title(),
        item.id,
        item.author(),
        format_age(item.created_at(), now)
    );
    if let Some(score) = item.score {
        line.push_str(&format!(", {} points", score));
    }
    if let Some(count) = item.descendants {
        line.push_str(&format!(", {} comments", count));
    }
    line
}

fn format_age(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "unknown time".to_string();
    };

    let age = now.signed_duration_since(created);
    if age.num_days() > 0 {
        format!("{}d ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m ago", age.num_minutes())
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_category_commands() {
        assert_eq!(
            parse_command("jobs").unwrap(),
            Command::Navigate(NavigationEvent::CategoryChanged(FeedCategory::Jobs))
        );
        assert_eq!(
            parse_command("  Polls ").unwrap(),
            Command::Navigate(NavigationEvent::CategoryChanged(FeedCategory::Polls))
        );
    }

    #[test]
    fn test_parse_open_requires_numeric_id() {
        assert_eq!(
            parse_command("open 8863").unwrap(),
            Command::Navigate(NavigationEvent::OpenThread(8863))
        );
        assert!(parse_command("open").is_err());
        assert!(parse_command("open abc").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_and_empty() {
        assert!(matches!(
            parse_command("frontpage"),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(parse_command("   ").is_err());
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
        assert_eq!(parse_command("more").unwrap(), Command::Navigate(NavigationEvent::LoadMore));
    }

    #[test]
    fn test_format_age_buckets() {
        let now = Utc::now();
        assert_eq!(format_age(Some(now - Duration::days(3)), now), "3d ago");
        assert_eq!(format_age(Some(now - Duration::hours(5)), now), "5h ago");
        assert_eq!(format_age(Some(now - Duration::minutes(12)), now), "12m ago");
        assert_eq!(format_age(Some(now), now), "just now");
        assert_eq!(format_age(None, now), "unknown time");
    }
}
