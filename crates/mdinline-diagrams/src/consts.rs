//! Defaults and renderer argument placeholders.

/// Default image directory, relative to the working directory.
pub const DEFAULT_IMAGE_DIR: &str = "image";

/// Default alt text for generated image embeds.
pub const DEFAULT_CAPTION: &str = "流程图";

/// Default number of documents processed in parallel.
pub const DEFAULT_JOBS: usize = 1;

/// Default background requested from the renderer.
pub const DEFAULT_BACKGROUND: &str = "transparent";

/// Default renderer program (Mermaid CLI).
pub const DEFAULT_PROGRAM: &str = "mmdc";

/// Placeholder for the definition file path in renderer arguments.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder for the image path in renderer arguments.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Placeholder for the background value in renderer arguments.
pub const BACKGROUND_PLACEHOLDER: &str = "{background}";

/// Default renderer argument template (Mermaid CLI layout).
pub const DEFAULT_ARGS: &[&str] = &[
    "-i",
    INPUT_PLACEHOLDER,
    "-o",
    OUTPUT_PLACEHOLDER,
    "-b",
    BACKGROUND_PLACEHOLDER,
];
