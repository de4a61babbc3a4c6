use std::fmt::Write as _;

use tokio::time::Instant;
use tracing::warn;

use mappings_core::{Context, MappingsConfig};
use mappings_data::{
    Channel, MappingsError, MappingsLibrary, Namespace, NamespaceId, QueryKind, VersionId,
};
use mappings_utils::pagination::{
    PageSet, PaginationSession, VERSION_CHUNK_SIZE, bulleted_chunks,
};

use crate::reply::Reply;

/// Show a namespace's defaults, channels and known versions.
///
/// The first page summarises the namespace; the rest list versions newest
/// first, with channel defaults highlighted.
pub async fn run(
    ctx: &Context,
    namespace: &'static Namespace,
    legacy_yarn_enabled: bool,
    owner_id: u64,
    reply: &dyn Reply,
) -> anyhow::Result<()> {
    let pages = match info_pages(
        ctx.library.as_ref(),
        &ctx.config,
        namespace,
        legacy_yarn_enabled,
    )
    .await
    {
        Ok(pages) => pages,
        Err(err) => {
            if let MappingsError::Library(source) = &err {
                warn!(?source, namespace = %namespace.id, "listing versions failed");
            }
            return match err.user_notice() {
                Some(notice) => reply.text(&notice).await,
                None => Ok(()),
            };
        }
    };

    let session = PaginationSession::new(owner_id, pages, ctx.config.timeout(), Instant::now());
    reply.paginate(session).await
}

/// Build the info pages for one namespace.
pub async fn info_pages(
    library: &dyn MappingsLibrary,
    config: &MappingsConfig,
    namespace: &Namespace,
    legacy_yarn_enabled: bool,
) -> Result<PageSet, MappingsError> {
    let mut versions = library.all_versions(namespace.key).await?;
    if versions.is_empty() {
        return Err(MappingsError::NoDefaultVersion {
            namespace: namespace.key,
        });
    }
    versions.reverse();

    let default_channel = config.default_channel(namespace);
    let default = library
        .default_version(namespace.key, default_channel)
        .await?;

    let mut channel_defaults: Vec<(Channel, Option<VersionId>)> = Vec::new();
    for channel in namespace.enabled_channels(|channel| config.channel_enabled(channel)) {
        if Some(channel) != default_channel {
            let version = library.default_version(namespace.key, Some(channel)).await?;
            channel_defaults.push((channel, version));
        }
    }

    let summary = summary_page(
        namespace,
        versions.len(),
        default.as_ref(),
        &channel_defaults,
        config,
        legacy_yarn_enabled,
    );

    let labels: Vec<String> = versions.iter().map(ToString::to_string).collect();
    let annotate = |label: &str| {
        if default.as_ref().is_some_and(|version| version.as_str() == label) {
            return Some("Default".to_owned());
        }

        channel_defaults
            .iter()
            .find(|(_, version)| version.as_ref().is_some_and(|v| v.as_str() == label))
            .map(|(channel, _)| format!("Default: {}", channel.label()))
    };

    let mut bodies = vec![summary];
    bodies.extend(bulleted_chunks(&labels, VERSION_CHUNK_SIZE, annotate));

    let title = format!("Mappings info: {}", namespace.display_name);
    PageSet::from_chunks(&title, None, &bodies).ok_or(MappingsError::EmptyResult)
}

fn summary_page(
    namespace: &Namespace,
    version_count: usize,
    default: Option<&VersionId>,
    channel_defaults: &[(Channel, Option<VersionId>)],
    config: &MappingsConfig,
    legacy_yarn_enabled: bool,
) -> String {
    let shown = |version: Option<&VersionId>| {
        version.map_or_else(|| "Unknown".to_owned(), ToString::to_string)
    };

    let mut body = format!(
        "{} mappings are available for queries across **{version_count}** versions.\n\n\
         **Default version:** {}\n",
        namespace.display_name,
        shown(default)
    );

    for (channel, version) in channel_defaults {
        let _ = writeln!(
            body,
            "**Default {} version:** {}",
            channel.label(),
            shown(version.as_ref())
        );
    }
    body.push('\n');

    let channels = namespace.enabled_channels(|channel| config.channel_enabled(channel));
    if !channels.is_empty() {
        let _ = writeln!(body, "**Channels:** {}", code_list(channels.iter().map(|c| c.as_str())));
    }

    let commands: Vec<String> = QueryKind::ALL
        .into_iter()
        .map(|kind| namespace.lookup_command(kind))
        .collect();
    let _ = write!(
        body,
        "**Commands:** {}\n\n\
         For a full list of supported {} versions, please view the rest of the pages.",
        code_list(commands.iter().map(String::as_str)),
        namespace.display_name
    );

    if namespace.key == NamespaceId::Yarn && legacy_yarn_enabled {
        let _ = write!(
            body,
            " For Legacy Yarn mappings, please see the `{}` command.",
            NamespaceId::LegacyYarn.namespace().info_command()
        );
    }

    body
}

pub(crate) fn code_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("`{item}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mappings_data::SnapshotLibrary;
    use mappings_data::snapshot::{NamespaceSnapshot, Snapshot};
    use mappings_utils::pagination::PageGroup;

    use super::*;
    use crate::test_support::{FIXTURE_SNAPSHOT, config};

    fn library() -> SnapshotLibrary {
        SnapshotLibrary::from_json(FIXTURE_SNAPSHOT).unwrap()
    }

    fn body(pages: &PageSet, index: usize) -> &str {
        &pages.page(PageGroup::More, index).unwrap().body
    }

    #[tokio::test]
    async fn yarn_summary_lists_defaults_channels_and_commands() {
        let library = library();
        let pages = info_pages(&library, &config(""), NamespaceId::Yarn.namespace(), true)
            .await
            .unwrap();

        assert_eq!(pages.len(PageGroup::More), 2);
        assert!(!pages.has_group(PageGroup::Less));
        assert_eq!(
            pages.page(PageGroup::More, 0).unwrap().title,
            "Mappings info: Yarn"
        );
        assert_eq!(
            body(&pages, 0),
            "Yarn mappings are available for queries across **4** versions.\n\n\
             **Default version:** 1.16.5\n\
             **Default Snapshot version:** 21w03a\n\n\
             **Channels:** `official`, `snapshot`\n\
             **Commands:** `yc`, `yf`, `ym`\n\n\
             For a full list of supported Yarn versions, please view the rest of the pages. \
             For Legacy Yarn mappings, please see the `lyarn` command."
        );
    }

    #[tokio::test]
    async fn version_pages_mark_channel_defaults_newest_first() {
        let library = library();
        let pages = info_pages(
            &library,
            &config("[yarn]\nchannels = [\"patchwork\"]\n"),
            NamespaceId::Yarn.namespace(),
            false,
        )
        .await
        .unwrap();

        assert!(body(&pages, 0).contains("**Default Patchwork version:** 21w05a\n"));
        assert!(!body(&pages, 0).contains("lyarn"));
        assert_eq!(
            body(&pages, 1),
            "**» 21w05a** (Default: Patchwork)\n\
             **» 21w03a** (Default: Snapshot)\n\
             **» 1.16.5** (Default)\n\
             **»** 1.16.4"
        );
    }

    #[tokio::test]
    async fn channelless_namespaces_skip_the_channel_line() {
        let library = library();
        let pages = info_pages(&library, &config(""), NamespaceId::Mcp.namespace(), false)
            .await
            .unwrap();

        assert!(!body(&pages, 0).contains("**Channels:**"));
        assert!(body(&pages, 0).contains("**Commands:** `mcpc`, `mcpf`, `mcpm`"));
        assert_eq!(body(&pages, 1), "**» 1.12.2** (Default)");
    }

    #[tokio::test]
    async fn twenty_five_versions_fill_four_pages() {
        let versions: Vec<VersionId> = (0..25).map(|n| VersionId::new(format!("1.{n}"))).collect();
        let mut namespaces = HashMap::new();
        namespaces.insert(
            "plasma".to_owned(),
            NamespaceSnapshot {
                default: versions.last().cloned(),
                versions,
                ..NamespaceSnapshot::default()
            },
        );
        let library = SnapshotLibrary::new(Snapshot { namespaces });

        let pages = info_pages(&library, &config(""), NamespaceId::Plasma.namespace(), false)
            .await
            .unwrap();

        assert_eq!(pages.len(PageGroup::More), 4);
        assert!(body(&pages, 0).contains("across **25** versions"));
        assert!(body(&pages, 1).starts_with("**» 1.24** (Default)"));
        assert_eq!(body(&pages, 3).lines().count(), 5);
    }

    #[tokio::test]
    async fn namespaces_without_versions_report_unavailable() {
        let library = library();
        let err = info_pages(&library, &config(""), NamespaceId::Yarrn.namespace(), false)
            .await
            .unwrap_err();

        assert_eq!(
            err.user_notice().as_deref(),
            Some("No yarrn mappings are available right now.")
        );
    }
}
