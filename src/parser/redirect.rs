use http::StatusCode;

/// A `.redirect` sidecar: first line is the status code, second the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSidecar {
    pub status: StatusCode,
    pub target: String,
}

// an unreadable status falls back to a temporary redirect; a missing target has nowhere to go
pub fn parse_redirect(content: &str) -> Option<RedirectSidecar> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

    let status_line = lines.next()?;
    let target = lines.next()?.to_string();

    let status = status_line
        .parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(StatusCode::is_redirection)
        .unwrap_or(StatusCode::FOUND);

    Some(RedirectSidecar { status, target })
}
