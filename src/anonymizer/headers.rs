use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};

pub(crate) const USER_AGENTS: [&str; 15] = [
    "Mozilla/5.0 (iPhone; U; CPU iOS 2_0 like Mac OS X; en-us)",
    "Mozilla/5.0 (Linux; U; Android 0.5; en-us)",
    "Mozilla/5.0 (iPad; U; CPU OS 3_2_1 like Mac OS X; en-us) AppleWebKit/531.21.10 (KHTML, like Gecko)",
    "Mozilla/4.0 (compatible; MSIE 7.0; Windows NT 6.0)",
    "Mozilla/4.0 (compatible; MSIE 6.0; Windows NT 5.1)",
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US) AppleWebKit/525.13 (KHTML, like Gecko) Chrome/0.2.149.29 Safari/525.13",
    "Opera/9.25 (Windows NT 6.0; U; en)",
    "Opera/9.80 (X11; Linux x86_64; U; pl) Presto/2.7.62 Version/11.00",
    "Opera/9.80 (Windows NT 6.0; U; en) Presto/2.7.39 Version/11.00",
    "Mozilla/5.0 (Windows NT 6.0; U; ja; rv:1.9.1.6) Gecko/20091201 Firefox/3.5.6 Opera 11.00",
    "Mozilla/4.0 (compatible; MSIE 8.0; X11; Linux x86_64; pl) Opera 11.00",
    "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; fr) Opera 11.00",
    "Opera/9.80 (Windows NT 6.1 x64; U; en) Presto/2.7.62 Version/11.00",
    "Mozilla/5.0 (Windows NT 5.1; U; de; rv:1.9.1.6) Gecko/20091201 Firefox/3.5.6 Opera 11.00",
    "Mozilla/4.0 (compatible; MSIE 8.0; X11; Linux x86_64; pl) Opera 11.00",
];

pub(crate) const ACCEPT_LANGUAGES: [&str; 6] = [
    "de-de,es-es;q=0.8,en-us;q=0.5,en;q=0.3",
    "en-us;q=0.8,en;q=0.3",
    "es;q=0.8,en-us;q=0.5,en;q=0.3",
    "es-es;q=0.8,en;q=0.3",
    "de-de;q=0.8,en;q=0.3",
    "de-de;q=0.8,en-us;q=0.5",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestHeaders {
    pub user_agent: &'static str,
    pub accept_language: &'static str,
}

impl RequestHeaders {
    pub fn random() -> Self {
        Self::choose(&mut rand::thread_rng())
    }

    pub(crate) fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // Both pools are non-empty constants.
        Self {
            user_agent: USER_AGENTS.choose(rng).copied().unwrap_or(USER_AGENTS[0]),
            accept_language: ACCEPT_LANGUAGES
                .choose(rng)
                .copied()
                .unwrap_or(ACCEPT_LANGUAGES[0]),
        }
    }

    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(self.user_agent),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(self.accept_language),
        );
        headers.insert(header::REFERER, HeaderValue::from_static(""));
        headers
    }
}
