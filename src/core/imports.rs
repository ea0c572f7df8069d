use crate::core::FileSystem;
use crate::domain::model::{ImportResolution, MissingPartial, MissingPartialReason, TemplateIndex};
use crate::utils::error::Result;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

pub const IMPORT_DIRECTIVE_PATTERN: &str = r"<!-- IMPORT (.+?) -->";

/// Partials whose substitution produced a region of text, outermost first.
type Chain = Arc<Vec<String>>;

struct Segment {
    end: usize,
    chain: Chain,
}

/// Tracks which substituted partial every byte of the working text came from.
struct Provenance {
    segments: Vec<Segment>,
}

impl Provenance {
    fn new(len: usize) -> Self {
        Self {
            segments: vec![Segment {
                end: len,
                chain: Arc::new(Vec::new()),
            }],
        }
    }

    fn chain_at(&self, pos: usize) -> Chain {
        self.segments
            .iter()
            .find(|segment| segment.end > pos)
            .map(|segment| segment.chain.clone())
            .unwrap_or_default()
    }

    /// Mirrors `text.replace_range(range, inserted)` where the inserted text has
    /// length `inserted_len` and came from `chain`.
    fn splice(&mut self, range: Range<usize>, inserted_len: usize, chain: Chain) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut start = 0;

        for segment in self.segments.drain(..) {
            if start < range.start {
                before.push(Segment {
                    end: segment.end.min(range.start),
                    chain: segment.chain.clone(),
                });
            }
            if segment.end > range.end {
                after.push(Segment {
                    end: segment.end - range.end + range.start + inserted_len,
                    chain: segment.chain,
                });
            }
            start = segment.end;
        }

        if inserted_len > 0 {
            before.push(Segment {
                end: range.start + inserted_len,
                chain,
            });
        }
        before.extend(after);
        self.segments = before;
    }
}

/// Inlines `<!-- IMPORT name -->` directives from the template index.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    directive: Regex,
}

impl ImportResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            directive: Regex::new(IMPORT_DIRECTIVE_PATTERN)?,
        })
    }

    /// Byte range of the first directive in `source` and the partial it names.
    pub fn find_directive<'t>(&self, source: &'t str) -> Option<(Range<usize>, &'t str)> {
        let caps = self.directive.captures(source)?;
        let whole = caps.get(0)?;
        let partial = caps.get(1)?;
        Some((whole.range(), partial.as_str()))
    }

    /// Replaces the first directive, then rescans the whole text, until none remain.
    ///
    /// A partial name resolves as written or with `.tpl` appended. A directive is elided
    /// (replaced with nothing, with a warning) when its partial is not indexed, is the template itself, or is already being expanded on the path that
    /// produced the directive.
    pub async fn resolve<F: FileSystem>(
        &self,
        fs: &F,
        index: &TemplateIndex,
        self_name: &str,
        source: String,
    ) -> Result<ImportResolution> {
        let mut text = source;
        let mut provenance = Provenance::new(text.len());
        let mut partials: HashMap<String, String> = HashMap::new();
        let mut missing = Vec::new();

        while let Some((range, partial)) = self.find_directive(&text) {
            let partial = partial.to_string();
            let chain = provenance.chain_at(range.start);

            let target = match index.lookup(&partial) {
                None => Err(MissingPartialReason::NotFound),
                Some((name, _)) if name == self_name => Err(MissingPartialReason::SelfImport),
                Some((name, _)) if chain.iter().any(|open| open == name) => {
                    Err(MissingPartialReason::Cycle)
                }
                Some(found) => Ok(found),
            };

            match target {
                Ok((name, path)) => {
                    if !partials.contains_key(name) {
                        let content = fs.read_to_string(path).await?;
                        partials.insert(name.to_string(), content);
                    }
                    let content = partials.get(name).map(String::as_str).unwrap_or_default();

                    let mut nested = chain.as_ref().clone();
                    nested.push(name.to_string());
                    provenance.splice(range.clone(), content.len(), Arc::new(nested));
                    text.replace_range(range, content);
                }
                Err(reason) => {
                    tracing::warn!(
                        "[templates] Partial not loaded: {} (in {}, {})",
                        partial,
                        self_name,
                        reason
                    );
                    provenance.splice(range.clone(), 0, chain);
                    text.replace_range(range, "");
                    missing.push(MissingPartial {
                        template: self_name.to_string(),
                        partial,
                        reason,
                    });
                }
            }
        }

        Ok(ImportResolution {
            source: text,
            missing,
        })
    }
}
