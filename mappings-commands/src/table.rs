//! Command registration from configuration.

use std::collections::HashMap;

use tracing::{info, warn};

use mappings_core::MappingsConfig;
use mappings_data::{Namespace, NamespaceId, QueryKind};
use mappings_utils::COMMAND_PREFIX;
use mappings_utils::checks::{CheckPipeline, SealedChecks};

use crate::info::code_list;

/// What a registered command does when invoked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Lookup(QueryKind),
    Info,
    Help,
}

/// One registered command with its aliases and access checks.
#[derive(Clone)]
pub struct CommandEntry {
    pub name: String,
    pub aliases: Vec<String>,
    /// `None` for commands outside any namespace.
    pub namespace: Option<&'static Namespace>,
    pub kind: CommandKind,
    pub description: String,
    pub usage: String,
    pub checks: CheckPipeline,
}

impl CommandEntry {
    /// Category heading used by `help`.
    pub fn category(&self) -> &'static str {
        self.namespace
            .map(|namespace| namespace.display_name)
            .unwrap_or("General")
    }
}

/// Every command registered for the enabled namespaces, looked up by name or alias.
pub struct CommandTable {
    entries: Vec<CommandEntry>,
    by_name: HashMap<String, usize>,
    namespaces: Vec<&'static Namespace>,
    needs_category: bool,
}

impl CommandTable {
    /// Register the lookup and info commands of every enabled namespace.
    ///
    /// Unknown namespace ids are logged and skipped. With no usable namespace
    /// nothing is registered, `help` included.
    pub fn build(config: &MappingsConfig, checks: &SealedChecks) -> Self {
        let lists = config.access_lists();
        let mut table = Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
            namespaces: Vec::new(),
            needs_category: lists.needs_category(),
        };

        for raw in config.enabled_namespaces() {
            match raw.parse::<NamespaceId>() {
                Ok(id) if table.is_enabled(id) => {}
                Ok(id) => table.namespaces.push(id.namespace()),
                Err(err) => warn!(namespace = %raw, "{err}"),
            }
        }

        if table.namespaces.is_empty() {
            warn!("No namespaces have been enabled, not registering commands.");
            return table;
        }

        let namespaces = table.namespaces.clone();
        for namespace in namespaces.iter().copied() {
            for kind in QueryKind::ALL {
                let mut names = namespace.lookup_names(kind);
                let name = names.remove(0);
                table.insert(CommandEntry {
                    checks: checks.build(&name, namespace.key, &lists),
                    usage: lookup_usage(namespace, &name),
                    description: lookup_description(namespace, kind, config),
                    name,
                    aliases: names,
                    namespace: Some(namespace),
                    kind: CommandKind::Lookup(kind),
                });
            }

            let name = namespace.info_command().to_owned();
            table.insert(CommandEntry {
                checks: checks.build(&name, namespace.key, &lists),
                usage: format!("{COMMAND_PREFIX}{name}"),
                description: format!(
                    "Get information and a list of supported versions for {} mappings.",
                    namespace.display_name
                ),
                name,
                aliases: namespace.info_names[1..]
                    .iter()
                    .map(|alias| (*alias).to_owned())
                    .collect(),
                namespace: Some(namespace),
                kind: CommandKind::Info,
            });
        }

        table.insert(CommandEntry {
            checks: checks.build_unscoped("help", &lists),
            usage: format!("{COMMAND_PREFIX}help [command]"),
            description: "Lists the available mappings commands.".to_owned(),
            name: "help".to_owned(),
            aliases: Vec::new(),
            namespace: None,
            kind: CommandKind::Help,
        });

        info!(
            namespaces = %namespaces
                .iter()
                .map(|namespace| namespace.id)
                .collect::<Vec<_>>()
                .join(", "),
            commands = table.entries.len(),
            "Mappings commands set up"
        );

        table
    }

    fn insert(&mut self, entry: CommandEntry) {
        let index = self.entries.len();
        for name in std::iter::once(&entry.name).chain(&entry.aliases) {
            if self.by_name.insert(name.clone(), index).is_some() {
                warn!(command = %name, "command name registered twice, last one wins");
            }
        }
        self.entries.push(entry);
    }

    /// Find a command by its name or one of its aliases, ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Option<&CommandEntry> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .and_then(|index| self.entries.get(*index))
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn namespaces(&self) -> &[&'static Namespace] {
        &self.namespaces
    }

    pub fn is_enabled(&self, id: NamespaceId) -> bool {
        self.namespaces.iter().any(|namespace| namespace.key == id)
    }

    /// Whether building an invocation needs the channel's parent category.
    pub fn needs_category(&self) -> bool {
        self.needs_category
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup_usage(namespace: &Namespace, name: &str) -> String {
    if namespace.channels.is_empty() {
        format!("{COMMAND_PREFIX}{name} <query> [version]")
    } else {
        format!("{COMMAND_PREFIX}{name} <query> [channel] [version]")
    }
}

fn lookup_description(namespace: &Namespace, kind: QueryKind, config: &MappingsConfig) -> String {
    let mut out = format!(
        "Look up {} mappings info for a {}.\n\n",
        namespace.display_name,
        kind.noun()
    );

    let channels = namespace.enabled_channels(|channel| config.channel_enabled(channel));
    if !channels.is_empty() {
        out.push_str(&format!(
            "**Channels:** {}\n\n",
            code_list(channels.iter().map(|channel| channel.as_str()))
        ));
    }

    out.push_str(&format!(
        "For more information or a list of versions for {} mappings, you can use the `{}` command.",
        namespace.display_name,
        namespace.info_command()
    ));
    out
}

#[cfg(test)]
mod tests {
    use mappings_utils::checks::{CheckRegistry, Invocation};
    use rstest::rstest;

    use super::*;

    fn config(raw: &str) -> MappingsConfig {
        MappingsConfig::from_toml(raw).unwrap()
    }

    fn table(raw: &str) -> CommandTable {
        CommandTable::build(&config(raw), &CheckRegistry::new().seal())
    }

    #[test]
    fn default_configuration_registers_every_namespace() {
        let table = table("");

        assert_eq!(table.namespaces().len(), NamespaceId::ALL.len());
        // Three lookups and one info per namespace, plus help.
        assert_eq!(table.entries().len(), NamespaceId::ALL.len() * 4 + 1);
    }

    #[rstest]
    #[case("yc", "yc", CommandKind::Lookup(QueryKind::Class))]
    #[case("YARNF", "yf", CommandKind::Lookup(QueryKind::Field))]
    #[case("mojmapm", "mmm", CommandKind::Lookup(QueryKind::Method))]
    #[case("legacyarnc", "lyc", CommandKind::Lookup(QueryKind::Class))]
    #[case("mojmap", "mojang", CommandKind::Info)]
    #[case("legacy-yarn", "lyarn", CommandKind::Info)]
    #[case("help", "help", CommandKind::Help)]
    fn aliases_resolve_to_their_command(
        #[case] invoked: &str,
        #[case] name: &str,
        #[case] kind: CommandKind,
    ) {
        let table = table("");
        let entry = table.resolve(invoked).unwrap();
        assert_eq!(entry.name, name);
        assert_eq!(entry.kind, kind);
    }

    #[test]
    fn unsupported_namespaces_are_skipped() {
        let table = table("[settings]\nnamespaces = [\"yarn\", \"intermediary\"]\n");

        assert_eq!(table.namespaces().len(), 1);
        assert!(table.is_enabled(NamespaceId::Yarn));
        assert!(table.resolve("mmc").is_none());
        assert!(table.resolve("yc").is_some());
    }

    #[test]
    fn no_namespaces_registers_nothing() {
        let table = table("[settings]\nnamespaces = []\n");
        assert!(table.is_empty());
        assert!(table.resolve("help").is_none());
    }

    #[test]
    fn usage_mentions_channels_only_where_they_exist() {
        let table = table("");
        assert_eq!(
            table.resolve("yc").unwrap().usage,
            "!yc <query> [channel] [version]"
        );
        assert_eq!(table.resolve("pc").unwrap().usage, "!pc <query> [version]");
    }

    #[test]
    fn lookup_descriptions_list_enabled_channels() {
        let yarn = table("[yarn]\nchannels = [\"patchwork\"]\n");
        assert_eq!(
            yarn.resolve("yc").unwrap().description,
            "Look up Yarn mappings info for a class.\n\n\
             **Channels:** `official`, `snapshot`, `patchwork`\n\n\
             For more information or a list of versions for Yarn mappings, \
             you can use the `yarn` command."
        );

        let default = table("");
        assert!(default.resolve("yf").unwrap().description.contains(
            "**Channels:** `official`, `snapshot`\n\n"
        ));
        assert!(!default.resolve("mmc").unwrap().description.contains("Channels"));
    }

    #[tokio::test]
    async fn each_command_gets_its_own_pipeline() {
        let mut registry = CheckRegistry::new();
        registry.add_name_check(|name: &str| {
            let blocked = name == "ym";
            move |_: &Invocation| !blocked
        });
        let table = CommandTable::build(&config(""), &registry.seal());
        let invocation = Invocation::default();

        assert!(table.resolve("yc").unwrap().checks.passes(&invocation).await);
        assert!(!table.resolve("ym").unwrap().checks.passes(&invocation).await);
        assert!(!table.resolve("yarnm").unwrap().checks.passes(&invocation).await);
    }

    #[test]
    fn category_lists_require_the_parent_channel() {
        assert!(!table("").needs_category());
        assert!(table("[categories]\nbanned = [5]\n").needs_category());
    }
}
