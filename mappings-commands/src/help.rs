use tokio::time::Instant;

use mappings_core::Context;
use mappings_utils::COMMAND_PREFIX;
use mappings_utils::pagination::{PageSet, PaginationSession};

use crate::reply::Reply;
use crate::table::{CommandEntry, CommandTable};

const HELP_COMMANDS_PER_PAGE: usize = 12;

/// Render the command catalog, or the usage of a single command.
///
/// Purpose:
/// - list every registered mappings command with its aliases.
///
/// Inputs:
/// - optional command name or alias: `!help [command]`.
///
/// Error behavior:
/// - unknown command returns a short not-found message.
pub async fn run(
    ctx: &Context,
    table: &CommandTable,
    owner_id: u64,
    arg1: Option<&str>,
    reply: &dyn Reply,
) -> anyhow::Result<()> {
    if let Some(raw_name) = arg1 {
        let lookup = raw_name.trim().trim_start_matches(COMMAND_PREFIX);
        let out = match table.resolve(lookup) {
            Some(entry) => command_usage(entry),
            None => format!("Unknown command: `{}`", lookup.to_ascii_lowercase()),
        };
        return reply.text(&out).await;
    }

    let Some(pages) = help_pages(table) else {
        return reply.text("No commands available.").await;
    };

    let session = PaginationSession::new(owner_id, pages, ctx.config.timeout(), Instant::now());
    reply.paginate(session).await
}

/// Catalog pages, grouped by namespace in registration order.
pub fn help_pages(table: &CommandTable) -> Option<PageSet> {
    let entries: Vec<&CommandEntry> = table.entries().iter().collect();
    let bodies: Vec<String> = entries
        .chunks(HELP_COMMANDS_PER_PAGE)
        .map(grouped_help_description)
        .collect();

    PageSet::from_chunks("Available Commands", None, &bodies)
}

fn grouped_help_description(commands: &[&CommandEntry]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category()) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", command.category()));
            current_category = Some(command.category());
        }

        out.push_str(&format!(
            "• {COMMAND_PREFIX}{}{} - {}\n",
            command.name,
            alias_suffix(command),
            summary_line(command)
        ));
    }

    out.trim_end().to_owned()
}

fn command_usage(entry: &CommandEntry) -> String {
    format!(
        "Usage: `{}`{}\n{}",
        entry.usage,
        alias_suffix(entry),
        entry.description
    )
}

fn alias_suffix(entry: &CommandEntry) -> String {
    if entry.aliases.is_empty() {
        return String::new();
    }

    let aliases: Vec<String> = entry
        .aliases
        .iter()
        .map(|alias| format!("`{alias}`"))
        .collect();
    format!(" ({})", aliases.join(", "))
}

fn summary_line(entry: &CommandEntry) -> &str {
    entry.description.lines().next().unwrap_or_default()
}
