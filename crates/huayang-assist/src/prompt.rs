//! Fixed prompts for drafting annotations and translations

use huayang_core::AssistTarget;

const TRANSLATION_PROMPT: &str = "请将以下古文（出自嘉庆版《华阳县志》）翻译成现代白话文。保持文风雅致，格式清晰。请直接输出翻译内容，不要包含多余的解释：";

const ANNOTATION_PROMPT: &str = "请为以下古文（出自嘉庆版《华阳县志》）提供详细的注释。解释生僻字、典故和地名。请使用HTML格式（如<ul><li>...</li></ul>）列出注释点：";

/// Prompt for `target` with the original text appended
#[must_use]
pub fn build_prompt(original: &str, target: AssistTarget) -> String {
    let instruction = match target {
        AssistTarget::Translation => TRANSLATION_PROMPT,
        AssistTarget::Annotation => ANNOTATION_PROMPT,
    };
    format!("{instruction}\n\n{original}")
}
