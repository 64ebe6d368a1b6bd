//! News articles and their sentiment scoring.

use serde::Serialize;

use crate::domain::sentiment::SentimentAnalyzer;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<String>,
}

impl NewsArticle {
    /// `title. description. content`, only when all three are present.
    pub fn scoring_text(&self) -> Option<String> {
        let title = self.title.as_deref()?;
        let description = self.description.as_deref()?;
        let content = self.content.as_deref()?;
        Some(format!("{title}. {description}. {content}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub title: String,
    pub url: Option<String>,
    pub compound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub company: String,
    pub average: f64,
    pub articles: Vec<ScoredArticle>,
}

/// Score every complete article; incomplete ones are skipped.
pub fn score_articles(
    analyzer: &SentimentAnalyzer,
    company: &str,
    articles: &[NewsArticle],
) -> SentimentReport {
    let scored: Vec<ScoredArticle> = articles
        .iter()
        .filter_map(|article| {
            let text = article.scoring_text()?;
            Some(ScoredArticle {
                title: article.title.clone().unwrap_or_default(),
                url: article.url.clone(),
                compound: analyzer.compound(&text),
            })
        })
        .collect();

    let average = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|a| a.compound).sum::<f64>() / scored.len() as f64
    };

    SentimentReport {
        company: company.to_string(),
        average,
        articles: scored,
    }
}
