/// Pagination relations parsed from an RFC 5988 `Link` response header.
///
/// The remote API communicates cursors as
/// `<https://host/resource?page=2>; rel="next", <...>; rel="last"`.
/// Absence of a `next` relation means the current page is the final one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelLinks {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub last: Option<String>,
}

impl RelLinks {
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();

        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let Some(target) = parts.next() else { continue };
            let target = target.trim();
            if !(target.starts_with('<') && target.ends_with('>')) {
                continue;
            }
            let url = &target[1..target.len() - 1];

            for param in parts {
                let Some((key, value)) = param.trim().split_once('=') else {
                    continue;
                };
                if key.trim() != "rel" {
                    continue;
                }
                match value.trim().trim_matches('"') {
                    "next" => links.next = Some(url.to_string()),
                    "prev" => links.prev = Some(url.to_string()),
                    "last" => links.last = Some(url.to_string()),
                    _ => {}
                }
            }
        }

        links
    }
}
