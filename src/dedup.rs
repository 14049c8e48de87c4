//! Style deduplication – moves inline `style` attributes into generated
//! classes backed by one shared stylesheet.
//!
//! The transform runs in strict phases over the elements that carry a
//! `style` attribute, in document order:
//!
//! 1. **Parse & count** – each style string becomes a property map, and every
//!    `prop:val` pair is counted once per element.
//! 2. **Select shared** – pairs seen on at least [`SHARED_THRESHOLD`]
//!    elements get their own single-declaration class, most frequent first.
//! 3. **Strip shared** – shared pairs are removed from each element's map.
//! 4. **Per-element classes** – whatever remains on an element is
//!    canonicalized (sorted by property) and mapped to one class per
//!    distinct body.
//! 5. **Apply** – `style` is replaced by the element's classes.
//! 6. **Emit** – one rule per distinct body, selectors grouped.

use std::fmt;

use indexmap::IndexMap;

use crate::dom::{Document, ElementNode};

/// Minimum number of elements a declaration must appear on to be extracted
/// into its own shared class.
pub const SHARED_THRESHOLD: usize = 2;

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// One `property: value` pair from a style attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// Lower-cased, trimmed property name.
    pub property: String,
    /// Trimmed raw value.
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.property, self.value)
    }
}

/// Parse a raw `style` attribute into its declarations, in source order.
///
/// Fragments without a `:`, with an empty property, or with an empty value
/// are dropped. Duplicates are kept; [`PropertyMap`] collapses them.
pub fn parse_declarations(style: &str) -> Vec<Declaration> {
    style
        .split(';')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .filter_map(|fragment| {
            let Some((property, value)) = fragment.split_once(':') else {
                log::trace!("dropping style fragment without ':' {fragment:?}");
                return None;
            };
            let property = property.trim().to_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                log::trace!("dropping incomplete style fragment {fragment:?}");
                return None;
            }
            Some(Declaration::new(property, value))
        })
        .collect()
}

/// Property → value in source order. A repeated property keeps its first
/// position and takes the last value.
pub type PropertyMap = IndexMap<String, String>;

fn property_map(declarations: Vec<Declaration>) -> PropertyMap {
    declarations
        .into_iter()
        .map(|d| (d.property, d.value))
        .collect()
}

/// Canonical `prop:val;prop:val` body for a property map, sorted by
/// property name.
pub fn canonical_body(props: &PropertyMap) -> String {
    let mut pairs: Vec<(&String, &String)> = props.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(p, v)| format!("{p}:{v}"))
        .collect::<Vec<_>>()
        .join(";")
}

// ---------------------------------------------------------------------------
// Class names
// ---------------------------------------------------------------------------

/// Class name for a zero-based index in bijective base 26:
/// `0 → a`, `25 → z`, `26 → aa`, `27 → ab`, `702 → aaa`.
pub fn class_name(index: usize) -> String {
    let mut n = index + 1;
    let mut bytes = Vec::new();
    while n > 0 {
        n -= 1;
        bytes.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    bytes.reverse();
    // Only ASCII lower-case letters are ever pushed.
    String::from_utf8(bytes).unwrap_or_default()
}

/// Sequential class-name source shared by the shared and per-element tables.
#[derive(Debug, Clone, Default)]
pub struct ClassNameGenerator {
    prefix: String,
    next: usize,
}

impl ClassNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose names all start with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("{}{}", self.prefix, class_name(self.next));
        self.next += 1;
        name
    }

    /// Number of names handed out since creation or the last reset.
    pub fn issued(&self) -> usize {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

// ---------------------------------------------------------------------------
// Stylesheet
// ---------------------------------------------------------------------------

/// One CSS rule: a selector list sharing a single declaration body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub body: String,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.selectors.join(","), self.body)
    }
}

/// Ordered list of generated rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Deduplicator
// ---------------------------------------------------------------------------

/// Options for [`StyleDeduplicator`].
#[derive(Debug, Clone, Default)]
pub struct DedupOptions {
    /// Prepended to every generated class name (default: none).
    pub class_prefix: String,
}

/// Result of one deduplication run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupOutcome {
    /// Unminified generated stylesheet.
    pub stylesheet: Stylesheet,
    /// Number of distinct per-element declaration-set classes.
    pub generated: usize,
    /// Number of single-declaration shared classes.
    pub shared: usize,
    /// Elements that had at least one usable declaration.
    pub styled_elements: usize,
}

/// Per-element working state between the scan and apply passes.
#[derive(Debug)]
struct ElementRecord {
    props: PropertyMap,
    shared: Vec<String>,
    own: Option<String>,
}

impl ElementRecord {
    fn class_list(&self) -> Vec<&str> {
        self.shared
            .iter()
            .map(String::as_str)
            .chain(self.own.as_deref())
            .collect()
    }
}

/// Rewrites inline styles into generated classes.
///
/// Owns the class-name generator, so repeated runs keep issuing fresh names
/// unless [`StyleDeduplicator::reset`] is called in between.
#[derive(Debug, Clone, Default)]
pub struct StyleDeduplicator {
    generator: ClassNameGenerator,
}

impl StyleDeduplicator {
    pub fn new(options: &DedupOptions) -> Self {
        Self {
            generator: ClassNameGenerator::with_prefix(options.class_prefix.clone()),
        }
    }

    /// Restart class naming from `a`.
    pub fn reset(&mut self) {
        self.generator.reset();
    }

    /// Replace every `style` attribute in `doc` and return the stylesheet
    /// that reproduces the removed declarations.
    pub fn deduplicate(&mut self, doc: &mut Document) -> DedupOutcome {
        // 1. Parse & count
        let mut records: Vec<ElementRecord> = Vec::new();
        let mut frequency: IndexMap<(String, String), usize> = IndexMap::new();
        doc.for_each_element_mut(|el| {
            let Some(style) = el.inline_style() else {
                return;
            };
            let declarations = parse_declarations(style);
            if declarations.is_empty() {
                el.remove_attr("style");
                return;
            }
            let props = property_map(declarations);
            for (p, v) in &props {
                *frequency.entry((p.clone(), v.clone())).or_insert(0) += 1;
            }
            records.push(ElementRecord {
                props,
                shared: Vec::new(),
                own: None,
            });
        });

        // 2. Select shared declarations, most frequent first. `sort_by` is
        //    stable, so ties keep discovery order.
        let mut selected: Vec<((String, String), usize)> = frequency
            .into_iter()
            .filter(|(_, count)| *count >= SHARED_THRESHOLD)
            .collect();
        selected.sort_by(|a, b| b.1.cmp(&a.1));
        let shared: Vec<(Declaration, String)> = selected
            .into_iter()
            .map(|((p, v), _)| (Declaration::new(p, v), self.generator.next_name()))
            .collect();

        // 3. Strip shared declarations
        for record in &mut records {
            for (decl, class) in &shared {
                if record.props.get(&decl.property) == Some(&decl.value) {
                    record.props.shift_remove(&decl.property);
                    record.shared.push(class.clone());
                }
            }
        }

        // 4. Per-element declaration-set classes
        let mut declaration_sets: IndexMap<String, String> = IndexMap::new();
        for record in &mut records {
            let body = canonical_body(&record.props);
            if body.is_empty() {
                continue;
            }
            let generator = &mut self.generator;
            let class = declaration_sets
                .entry(body)
                .or_insert_with(|| generator.next_name())
                .clone();
            record.own = Some(class);
        }

        // 5. Apply
        let mut pending = records.iter();
        doc.for_each_element_mut(|el| {
            if el.remove_attr("style").is_none() {
                return;
            }
            if let Some(record) = pending.next() {
                apply_classes(el, &record.class_list());
            }
        });

        // 6. Emit
        let mut bodies: IndexMap<String, Vec<String>> = IndexMap::new();
        for (decl, class) in &shared {
            bodies.entry(decl.to_string()).or_default().push(format!(".{class}"));
        }
        for (body, class) in &declaration_sets {
            bodies.entry(body.clone()).or_default().push(format!(".{class}"));
        }
        let stylesheet = Stylesheet {
            rules: bodies
                .into_iter()
                .map(|(body, selectors)| Rule { selectors, body })
                .collect(),
        };

        let outcome = DedupOutcome {
            stylesheet,
            generated: declaration_sets.len(),
            shared: shared.len(),
            styled_elements: records.len(),
        };
        log::debug!(
            "deduplicated {} styled elements into {} shared and {} generated classes ({} names issued)",
            outcome.styled_elements,
            outcome.shared,
            outcome.generated,
            self.generator.issued()
        );
        outcome
    }
}

/// Append generated classes after any classes the element already had.
fn apply_classes(el: &mut ElementNode, classes: &[&str]) {
    if classes.is_empty() {
        return;
    }
    let mut list: Vec<&str> = el.classes();
    list.extend_from_slice(classes);
    let value = list.join(" ");
    el.set_attr("class", value);
}

/// One-shot deduplication with a fresh generator.
pub fn deduplicate(doc: &mut Document, options: &DedupOptions) -> DedupOutcome {
    StyleDeduplicator::new(options).deduplicate(doc)
}
