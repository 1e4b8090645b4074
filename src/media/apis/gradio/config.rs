pub static PREDICT_PATH: &str = "/run/predict";
pub static FILE_PATH: &str = "/file=";
pub static FN_INDEX: u32 = 0;

pub fn predict_url(base_url: &str) -> String {
    [base_url.trim_end_matches('/'), PREDICT_PATH].concat()
}

pub fn file_url(base_url: &str, remote_path: &str) -> String {
    [base_url.trim_end_matches('/'), FILE_PATH, remote_path].concat()
}

pub fn absolute_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    [
        base_url.trim_end_matches('/'),
        "/",
        url.trim_start_matches('/'),
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_without_double_slashes() {
        assert_eq!(
            predict_url("https://abc.gradio.live/"),
            "https://abc.gradio.live/run/predict"
        );
        assert_eq!(
            file_url("https://abc.gradio.live", "/tmp/gradio/out.png"),
            "https://abc.gradio.live/file=/tmp/gradio/out.png"
        );
        assert_eq!(
            absolute_url("https://abc.gradio.live/", "/file=x.png"),
            "https://abc.gradio.live/file=x.png"
        );
        assert_eq!(
            absolute_url("https://abc.gradio.live", "https://cdn.example/x.png"),
            "https://cdn.example/x.png"
        );
    }
}
