//! 模型输出的标记清理

/// 去掉模型在HTML片段外包裹的代码围栏
///
/// 与 "```html" 一样，所有 "```" 都会被移除，片段内部出现的围栏也不例外。
pub fn strip_markup_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "").trim().to_string()
}

/// 转义需要原样嵌入HTML的用户文本
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
