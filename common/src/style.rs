use anyhow::Result;

use crate::dom::Page;

// rules the behaviors depend on but the page stylesheet does not ship
pub const BEHAVIOR_STYLES: &str = r#"
.animate-in {
    animation: fadeInUp 0.6s ease-out;
}

@keyframes fadeInUp {
    from {
        opacity: 0;
        transform: translateY(30px);
    }
    to {
        opacity: 1;
        transform: translateY(0);
    }
}

@keyframes slideInLeft {
    from {
        opacity: 0;
        transform: translateX(-30px);
    }
    to {
        opacity: 1;
        transform: translateX(0);
    }
}

.notification-content {
    display: flex;
    align-items: center;
    gap: 0.5rem;
}

.nav-link.active {
    color: var(--primary-color);
}

.nav-link.active::after {
    width: 100%;
}
"#;

pub fn inject_styles<P: Page>(page: &P) -> Result<P::Element> {
    let head = page
        .head()
        .ok_or_else(|| anyhow::Error::msg("document has no head"))?;

    let style = page.create_element("style")?;
    page.set_text(&style, BEHAVIOR_STYLES);
    page.append(&head, &style)?;
    Ok(style)
}
