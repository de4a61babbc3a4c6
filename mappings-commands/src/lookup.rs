use tokio::time::Instant;
use tracing::{debug, warn};

use mappings_core::{Context, MappingsConfig};
use mappings_data::{MappingsError, MappingsLibrary, Namespace, QueryKind, resolve_provider};
use mappings_utils::pagination::{PageSet, PaginationSession};
use mappings_utils::parse::{LookupArgs, normalize_query, parse_lookup_args};

use crate::reply::Reply;
use crate::table::CommandEntry;

/// Look up classes, fields or methods in one namespace.
///
/// Purpose:
/// - show every matching identifier of the chosen (or default) version.
///
/// Inputs:
/// - `!<command> <query> [channel] [version]`; dots in the query may stand in for slashes.
///
/// Error behavior:
/// - missing query, or a channel or version given twice, returns this command's usage.
/// - disabled channels, unknown versions and empty results are reported as plain messages.
/// - library failures are logged and reported without propagating.
pub async fn run(
    ctx: &Context,
    entry: &CommandEntry,
    namespace: &'static Namespace,
    kind: QueryKind,
    owner_id: u64,
    rest: Option<&str>,
    reply: &dyn Reply,
) -> anyhow::Result<()> {
    let Some(args) = parse_lookup_args(namespace, rest) else {
        return reply.text(&format!("Usage: `{}`", entry.usage)).await;
    };

    if let Err(err) = check_channel(&ctx.config, &args) {
        return reply_error(reply, namespace, &err).await;
    }

    if let Err(source) = reply.typing().await {
        debug!(?source, "typing indicator failed");
    }

    let pages = match lookup_pages(ctx.library.as_ref(), &ctx.config, namespace, kind, &args).await
    {
        Ok(pages) => pages,
        Err(err) => return reply_error(reply, namespace, &err).await,
    };

    let session = PaginationSession::new(owner_id, pages, ctx.config.timeout(), Instant::now());
    reply.paginate(session).await
}

/// Reject channels configuration switched off, before anything is resolved.
pub fn check_channel(config: &MappingsConfig, args: &LookupArgs) -> Result<(), MappingsError> {
    match args.channel {
        Some(channel) if !config.channel_enabled(channel) => {
            Err(MappingsError::ChannelDisabled(channel))
        }
        _ => Ok(()),
    }
}

/// Resolve the dataset, run the query and lay the results out as pages.
///
/// An empty result is [`MappingsError::EmptyResult`]; no pages are built for it.
pub async fn lookup_pages(
    library: &dyn MappingsLibrary,
    config: &MappingsConfig,
    namespace: &Namespace,
    kind: QueryKind,
    args: &LookupArgs,
) -> Result<PageSet, MappingsError> {
    let mut provider = resolve_provider(
        library,
        namespace,
        args.version.as_deref(),
        args.channel,
        config.default_channel(namespace),
    )
    .await?;

    let dataset = provider.dataset(library).await?;
    let results = library
        .query(kind, &dataset, &normalize_query(&args.query))
        .await?;

    debug!(
        namespace = %namespace.id,
        version = %dataset.version,
        kind = kind.noun(),
        results = results.len(),
        "mappings query finished"
    );

    let title = format!(
        "List of {} {}: {}",
        dataset.name,
        kind.plural(),
        dataset.version
    );
    let footer = match results.len() {
        1 => "1 result".to_owned(),
        count => format!("{count} results"),
    };

    PageSet::from_results(&title, Some(&footer), &results).ok_or(MappingsError::EmptyResult)
}

async fn reply_error(
    reply: &dyn Reply,
    namespace: &Namespace,
    err: &MappingsError,
) -> anyhow::Result<()> {
    if let MappingsError::Library(source) = err {
        warn!(?source, namespace = %namespace.id, "mappings query failed");
    }

    match err.user_notice() {
        Some(notice) => reply.text(&notice).await,
        None => Ok(()),
    }
}
