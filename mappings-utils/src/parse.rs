use mappings_data::{Channel, Namespace};

/// Parsed arguments of a lookup command: `<query> [channel] [version]`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LookupArgs {
    pub query: String,
    pub channel: Option<Channel>,
    pub version: Option<String>,
}

/// Parse lookup arguments for a namespace.
///
/// The first token is the query. Of the remaining tokens, one naming a
/// channel the namespace has (enabled or not) is the channel; any other is
/// the version. Returns `None` when the query is missing, or when a channel
/// or version is given twice.
pub fn parse_lookup_args(namespace: &Namespace, raw: Option<&str>) -> Option<LookupArgs> {
    let mut tokens = raw?.split_whitespace();
    let query = tokens.next()?.to_owned();

    let mut args = LookupArgs {
        query,
        ..LookupArgs::default()
    };

    for token in tokens {
        match Channel::parse(token).filter(|channel| namespace.supports(*channel)) {
            Some(channel) if args.channel.is_none() => args.channel = Some(channel),
            Some(_) => return None,
            None if args.version.is_none() => args.version = Some(token.to_owned()),
            None => return None,
        }
    }

    Some(args)
}

/// Normalise a user query to the library's path form (`a.b.C` to `a/b/C`).
pub fn normalize_query(raw: &str) -> String {
    raw.trim().replace('.', "/")
}
