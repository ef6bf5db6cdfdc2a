/*!
 * Prompt templates for document translation.
 *
 * A template is a plain string holding the placeholders `{source_lang}`,
 * `{target_lang}` and `{text}`. Rendering is literal replacement, with the
 * segment text substituted last so placeholder-looking content inside a
 * document is never re-expanded.
 */

use log::warn;

/// Prompt template with named placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Faithful general-purpose translation.
    pub const STANDARD: &'static str = r#"You are a professional translator. Translate the following text from {source_lang} to {target_lang}.

Requirements:
- Preserve the original formatting and structure
- Keep code blocks, markup tags and other special formatting untouched
- Translate accurately and fluently, following the conventions of the target language
- Do not add explanations or commentary

Source text:
{text}

Translation:"#;

    /// Terminology-preserving translation for technical documents.
    pub const TECHNICAL: &'static str = r#"You are a professional technical documentation translator. Translate the following {source_lang} documentation into {target_lang}.

Requirements:
- Keep all Markdown formatting, code blocks and links intact
- Translate terminology accurately and consistently
- Translate code comments as well
- Do not add explanations or commentary

Source text:
{text}

Translation:"#;

    /// Fluent, expressive translation for literary text.
    pub const LITERARY: &'static str = r#"You are a professional literary translator. Translate the following text from {source_lang} to {target_lang}.

Requirements:
- Preserve the style and tone of the original
- Favor natural, flowing language in the target language
- Keep the emotional register of the source
- Account for cultural differences where needed

Source text:
{text}

Translation:"#;

    /// Minimal prompt used when a supplied template cannot be applied.
    /// The markers keep the model from reading instructions as content.
    const FALLBACK: &'static str = r#"Translate the text between the <<TEXT>> and <<END>> markers from {source_lang} to {target_lang}. Output only the translation.

<<TEXT>>
{text}
<<END>>"#;

    /// Create a template from a custom string.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// The standard translation template.
    pub fn standard() -> Self {
        Self::new(Self::STANDARD)
    }

    /// The technical documentation template.
    pub fn technical() -> Self {
        Self::new(Self::TECHNICAL)
    }

    /// The literary translation template.
    pub fn literary() -> Self {
        Self::new(Self::LITERARY)
    }

    /// Look up a built-in template by its configuration name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" => Some(Self::standard()),
            "technical" => Some(Self::technical()),
            "literary" => Some(Self::literary()),
            _ => None,
        }
    }

    /// Render the template with the given languages and segment text.
    ///
    /// A template without the `{text}` placeholder would silently drop the
    /// segment, so rendering fails closed to the minimal fallback prompt
    /// instead of producing a contentless request.
    pub fn render(&self, source_lang: &str, target_lang: &str, text: &str) -> String {
        if !self.template.contains("{text}") {
            warn!("Prompt template has no {{text}} placeholder, falling back to the minimal template");
            return Self::render_fallback(source_lang, target_lang, text);
        }

        self.template
            .replace("{source_lang}", source_lang)
            .replace("{target_lang}", target_lang)
            .replace("{text}", text)
    }

    fn render_fallback(source_lang: &str, target_lang: &str, text: &str) -> String {
        Self::FALLBACK
            .replace("{source_lang}", source_lang)
            .replace("{target_lang}", target_lang)
            .replace("{text}", text)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::standard()
    }
}
