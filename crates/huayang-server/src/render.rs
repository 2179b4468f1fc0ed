//! HTML pages
//!
//! Plain string rendering. Titles, messages and form values are escaped;
//! rendition HTML is written verbatim because only authenticated editors
//! produce it.

use huayang_core::{
    AdminDashboard, HomeEntry, ReaderContent, ReaderView, Rendition, Volume, TOOLBAR,
};
use std::fmt::Write;
use std::time::Instant;

/// Header text
pub const SITE_TITLE: &str = "华阳县志";

/// Edition badge
pub const EDITION_BADGE: &str = "嘉庆版";

/// Footer text
pub const FOOTER: &str = "蜀都古韵 · 岁月留痕";

/// Overwrite confirmation shown before AI generation
pub const ASSIST_CONFIRM: &str = "确定要使用 Gemini AI 自动生成内容吗？这将覆盖当前编辑框的内容。";

/// Escape text for element content and quoted attributes
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Wrap a page body in the site chrome
///
/// `editor` is the display name when the visitor is logged in.
#[must_use]
pub fn layout(title: &str, editor: Option<&str>, body: &str) -> String {
    let account = match editor {
        Some(name) => format!(
            r#"<span class="editor">管理员: {}</span><form method="post" action="/logout" class="inline"><button type="submit">退出</button></form>"#,
            escape(name)
        ),
        None => r#"<a href="/login" class="login">登录</a>"#.to_string(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{page} · {SITE_TITLE}</title>
</head>
<body>
<header>
<a href="/" class="masthead"><span class="badge">{EDITION_BADGE}</span><h1>{SITE_TITLE}</h1></a>
<div class="account">{account}</div>
</header>
<main>
{body}
</main>
<footer><p>{FOOTER}</p></footer>
</body>
</html>
"#,
        page = escape(title),
    )
}

/// Table of contents
#[must_use]
pub fn home_page(entries: &[HomeEntry], editor: Option<&str>) -> String {
    let mut body = String::from(r#"<h2 class="toc">目录</h2><div class="volumes">"#);
    for entry in entries {
        let _ = write!(
            body,
            r#"<a class="volume" href="{}"><span>✧</span>{}</a>"#,
            escape(&entry.href),
            escape(&entry.title)
        );
    }
    body.push_str("</div>");
    layout("目录", editor, &body)
}

/// One volume, active tab only
#[must_use]
pub fn reader_page(view: &ReaderView, editor: Option<&str>) -> String {
    let volume = view.volume();
    let mut body = format!(
        r#"<article class="reader"><div class="reader-head"><h2>{}</h2><nav class="tabs">"#,
        escape(&volume.title)
    );
    for (rendition, active) in view.tabs() {
        let _ = write!(
            body,
            r#"<a href="/read/{}?tab={}"{}>{}</a>"#,
            escape(volume.id.as_str()),
            rendition.key(),
            if active { r#" class="active""# } else { "" },
            rendition.label()
        );
    }
    body.push_str(r#"</nav></div><div class="content">"#);
    match view.content() {
        ReaderContent::Html(html) => body.push_str(html),
        ReaderContent::Empty { placeholder } => {
            let _ = write!(
                body,
                r#"<div class="empty"><span>❖</span><p>{}</p></div>"#,
                escape(&placeholder)
            );
        }
    }
    body.push_str(r#"</div><a class="back" href="/">返回目录</a></article>"#);
    layout(&volume.title, editor, &body)
}

/// Login form, with an inline error after a rejected attempt
#[must_use]
pub fn login_page(error: Option<&str>, editor: Option<&str>) -> String {
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape(message)))
        .unwrap_or_default();
    let body = format!(
        r#"<form method="post" action="/login" class="login-form">
<h3>管理员登录</h3>
<label>用户名 <input type="text" name="username" autocomplete="username"></label>
<label>密码 <input type="password" name="password" autocomplete="current-password"></label>
{error}<button type="submit">登 录</button>
</form>"#
    );
    layout("管理员登录", editor, &body)
}

fn admin_link(volume: &Volume, tab: Rendition) -> String {
    format!("/admin?volume={}&amp;tab={}", escape(volume.id.as_str()), tab.key())
}

/// Editing dashboard
#[must_use]
pub fn admin_page(
    volumes: &[Volume],
    dashboard: &AdminDashboard,
    notice: Option<&str>,
    editor: Option<&str>,
    now: Instant,
) -> String {
    let selected = volumes.iter().find(|v| &v.id == dashboard.selected_id());
    let tab = dashboard.tab();

    let mut body = String::from(r#"<div class="admin"><aside><h3>卷目列表</h3><ul>"#);
    for volume in volumes {
        let active = &volume.id == dashboard.selected_id();
        let _ = write!(
            body,
            r#"<li{}><a href="{}">{}</a></li>"#,
            if active { r#" class="active""# } else { "" },
            admin_link(volume, tab),
            escape(&volume.title)
        );
    }
    body.push_str("</ul></aside><section>");

    let title = selected.map(|v| v.title.as_str()).unwrap_or_default();
    let _ = write!(body, r#"<div class="admin-head"><h2>{} - 编辑</h2>"#, escape(title));
    if tab != Rendition::Original {
        let (label, disabled) = if dashboard.is_ai_loading() {
            ("生成中...", " disabled")
        } else if dashboard.can_assist(volumes) {
            ("✨ AI 生成", "")
        } else {
            ("✨ AI 生成", " disabled")
        };
        let _ = write!(
            body,
            r#"<form method="post" action="/admin/assist" class="inline"><button type="submit" class="assist"{disabled}>{label}</button></form>"#
        );
    }
    body.push_str("</div>");

    if let Some(message) = notice {
        let _ = write!(body, r#"<p class="notice">{}</p>"#, escape(message));
    }

    body.push_str(r#"<nav class="tabs">"#);
    if let Some(volume) = selected {
        for rendition in Rendition::ALL {
            let _ = write!(
                body,
                r#"<a href="{}"{}>{}</a>"#,
                admin_link(volume, rendition),
                if rendition == tab { r#" class="active""# } else { "" },
                rendition.label()
            );
        }
    }
    body.push_str("</nav>");

    body.push_str(r#"<p class="hint">可直接粘贴 Word 文档内容（带格式）</p>"#);
    body.push_str(r#"<form method="post" action="/admin/edit" class="editor"><div class="toolbar">"#);
    for button in TOOLBAR {
        let value = match button.arg {
            Some(arg) => format!("{}:{arg}", button.command),
            None => button.command.to_string(),
        };
        let _ = write!(
            body,
            r#"<button type="submit" name="command" value="{}" title="{}">{}</button>"#,
            escape(&value),
            escape(button.title),
            escape(button.label)
        );
    }
    body.push_str(concat!(
        r#"<label>段落 <input type="number" name="from" min="0" value="0"></label>"#,
        r#"<label>至 <input type="number" name="to" min="0"></label>"#,
        r#"<input type="url" name="url" placeholder="图片地址">"#,
        "</div>"
    ));

    let save_label = if dashboard.is_saving_at(now) {
        "保存中..."
    } else {
        "保存修改"
    };
    let _ = write!(
        body,
        r#"<textarea name="content" rows="20" placeholder="{}">{}</textarea><button type="submit" formaction="/admin/save" class="save">{save_label}</button></form>"#,
        escape(dashboard.editor().placeholder()),
        escape(dashboard.buffer())
    );

    body.push_str(r#"<div class="preview">"#);
    body.push_str(dashboard.buffer());
    body.push_str("</div></section></div>");

    layout("管理后台", editor, &body)
}

/// Overwrite confirmation before an AI draft
#[must_use]
pub fn confirm_assist_page(volume_title: &str, target: Rendition, editor: Option<&str>) -> String {
    let body = format!(
        r#"<div class="confirm">
<h3>{} · {}</h3>
<p>{ASSIST_CONFIRM}</p>
<form method="post" action="/admin/assist"><input type="hidden" name="confirm" value="yes"><button type="submit">确定</button></form>
<a href="/admin">取消</a>
</div>"#,
        escape(volume_title),
        target.label()
    );
    layout("AI 生成", editor, &body)
}

/// Generic failure page
#[must_use]
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<div class="error-page"><p>{}</p><a href="/">返回目录</a></div>"#,
        escape(message)
    );
    layout("出错了", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huayang_core::{home_entries, seed_volumes, ReaderOutcome, VolumeId};
    use pretty_assertions::assert_eq;

    #[test]
    fn escape_special_characters() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape("卷一"), "卷一");
    }

    #[test]
    fn layout_shows_account_state() {
        let anonymous = layout("t", None, "");
        assert!(anonymous.contains(r#"href="/login""#));
        assert!(!anonymous.contains("管理员:"));

        let editor = layout("t", Some("llh"), "");
        assert!(editor.contains("管理员: llh"));
        assert!(editor.contains(r#"action="/logout""#));
        assert!(editor.contains(FOOTER));
    }

    #[test]
    fn home_lists_every_volume() {
        let page = home_page(&home_entries(&seed_volumes()), None);
        assert_eq!(page.matches(r#"class="volume""#).count(), 44);
        assert!(page.contains(r#"href="/read/vol-44""#));
    }

    #[test]
    fn reader_renders_html_verbatim_and_title_escaped() {
        let volumes = vec![Volume::new("vol-1", "<卷>")
            .with_field(Rendition::Original, "<p><strong>原</strong></p>")];
        let ReaderOutcome::Show(view) = ReaderView::open(&volumes, &VolumeId::seed(1)) else {
            panic!("volume exists");
        };

        let page = reader_page(&view, None);
        assert!(page.contains("<p><strong>原</strong></p>"));
        assert!(page.contains("<h2>&lt;卷&gt;</h2>"));
        assert!(page.contains(r#"href="/read/vol-1?tab=original" class="active""#));

        let page = reader_page(&view.with_tab(Rendition::Annotation), None);
        assert!(page.contains("暂无注释内容"));
    }

    #[test]
    fn admin_page_escapes_buffer_in_textarea() {
        let volumes = seed_volumes();
        let mut dashboard = AdminDashboard::new(&volumes).unwrap();
        dashboard.edit("<p>a&b</p>");

        let page = admin_page(&volumes, &dashboard, Some("<提示>"), Some("llh"), Instant::now());
        assert!(page.contains(">&lt;p&gt;a&amp;b&lt;/p&gt;</textarea>"));
        assert!(page.contains(r#"<div class="preview"><p>a&b</p></div>"#));
        assert!(page.contains("&lt;提示&gt;"));
        assert!(page.contains("卷一 - 编辑"));
        // No assist button on the original tab
        assert!(!page.contains("/admin/assist"));
        assert!(page.contains(r#"value="formatBlock:H3""#));
    }

    #[test]
    fn admin_page_assist_button_states() {
        let volumes = seed_volumes();
        let mut dashboard = AdminDashboard::new(&volumes).unwrap();
        dashboard.select_tab(&volumes, Rendition::Translation).unwrap();

        let page = admin_page(&volumes, &dashboard, None, None, Instant::now());
        assert!(page.contains(r#"class="assist">✨ AI 生成"#));
        assert!(page.contains("在此输入或粘贴译文..."));

        dashboard.begin_assist(&volumes, true).unwrap();
        let page = admin_page(&volumes, &dashboard, None, None, Instant::now());
        assert!(page.contains(r#"class="assist" disabled>生成中..."#));
    }

    #[test]
    fn admin_page_disables_assist_for_blank_original() {
        let mut volumes = seed_volumes();
        volumes[0].original = "<p><br></p>".into();
        let mut dashboard = AdminDashboard::new(&volumes).unwrap();
        dashboard.select_tab(&volumes, Rendition::Annotation).unwrap();

        let page = admin_page(&volumes, &dashboard, None, None, Instant::now());
        assert!(page.contains(r#"class="assist" disabled>✨ AI 生成"#));
    }

    #[test]
    fn confirm_page_posts_confirmation() {
        let page = confirm_assist_page("卷一", Rendition::Annotation, Some("llh"));
        assert!(page.contains(ASSIST_CONFIRM));
        assert!(page.contains(r#"name="confirm" value="yes""#));
        assert!(page.contains("卷一 · 注释"));
    }
}
