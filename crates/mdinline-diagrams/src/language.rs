//! Diagram types for supported diagram languages.
//!
//! Each language knows the fence tags that mark its blocks and the extension
//! its renderer expects for definition files.

use std::sync::LazyLock;

use regex::Regex;

static MERMAID_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\b\s*(.*?)\s*```").unwrap());

static PLANTUML_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```plantuml\b\s*(.*?)\s*```").unwrap());

static GRAPHVIZ_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:graphviz|dot)\b\s*(.*?)\s*```").unwrap());

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramLanguage {
    #[default]
    Mermaid,
    PlantUml,
    GraphViz,
}

impl DiagramLanguage {
    /// Parse language from a code fence tag.
    ///
    /// Returns None if the tag is not a supported diagram type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mermaid" => Some(Self::Mermaid),
            "plantuml" => Some(Self::PlantUml),
            "graphviz" | "dot" => Some(Self::GraphViz),
            _ => None,
        }
    }

    /// Canonical fence tag, also used as the image filename prefix.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
            Self::GraphViz => "graphviz",
        }
    }

    /// Extension of the temporary definition file handed to the renderer.
    #[must_use]
    pub fn definition_extension(self) -> &'static str {
        match self {
            Self::Mermaid => "mmd",
            Self::PlantUml => "puml",
            Self::GraphViz => "dot",
        }
    }

    /// Pattern matching a whole fenced block, capturing the trimmed source.
    ///
    /// The inner match is lazy, so a block ends at the first closing fence.
    pub(crate) fn block_pattern(self) -> &'static Regex {
        match self {
            Self::Mermaid => &MERMAID_BLOCK,
            Self::PlantUml => &PLANTUML_BLOCK,
            Self::GraphViz => &GRAPHVIZ_BLOCK,
        }
    }
}

/// Output format for rendered diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// PNG raster image (default).
    #[default]
    Png,
    /// SVG vector image.
    Svg,
}

impl DiagramFormat {
    /// Parse format from a configuration value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// File extension of the rendered image.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}
