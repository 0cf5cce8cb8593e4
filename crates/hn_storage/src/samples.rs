use chrono::{DateTime, TimeZone, Utc};
use hn_core::Article;

fn published(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// The fixed set of health-news articles offered by the loader.
pub fn sample_articles() -> Vec<Article> {
    vec![
        Article {
            id: "art-001".to_string(),
            title: "Mediterranean Diet Linked to Improved Heart Health".to_string(),
            source: "Global Health Wire".to_string(),
            published_at: published(2025, 11, 20, 9, 0),
            author: Some("Dr. Riya Mehta".to_string()),
            url: "https://example.com/mediterranean-heart-health".to_string(),
            content: "A multi-center clinical study following 5,500 adults across three continents found that participants adhering to a Mediterranean-style diet reduced their risk of major cardiovascular events by 23% over four years. Researchers highlight that the dietary pattern\u{2014}rich in olive oil, legumes, whole grains, leafy greens, and moderate fish intake\u{2014}improves lipid profiles and lowers inflammatory markers. The study also notes improved blood pressure control and better adherence compared with low-fat diets. Healthcare providers are encouraged to pair dietary counseling with hands-on cooking education to enhance patient compliance.".to_string(),
        },
        Article {
            id: "art-002".to_string(),
            title: "AI Tool Speeds Up Rare Disease Diagnosis".to_string(),
            source: "MedTech Daily".to_string(),
            published_at: published(2025, 11, 18, 15, 30),
            author: Some("Jason Clark".to_string()),
            url: "https://example.com/ai-rare-disease".to_string(),
            content: "Clinicians at the University of Leiden released a study on an AI-driven platform that analyzes genomic data and electronic health records to flag probable rare diseases. In a cohort of 1,200 patients, the system delivered preliminary diagnoses 40% faster than traditional workflows. Investigators caution that the tool is meant to augment, not replace, clinician judgment, and emphasized the need for diverse data inputs to prevent biased recommendations. Regulatory review is underway, and early adopters are focusing on expanding datasets for underrepresented populations.".to_string(),
        },
        Article {
            id: "art-003".to_string(),
            title: "Short Walks After Meals May Lower Blood Sugar Spikes".to_string(),
            source: "Everyday Health Watch".to_string(),
            published_at: published(2025, 11, 10, 7, 45),
            author: Some("Lena Ortiz".to_string()),
            url: "https://example.com/post-meal-walks".to_string(),
            content: "A meta-analysis covering eight small randomized trials suggests that walking for even 7\u{2013}10 minutes within 30 minutes of eating can blunt postprandial glucose spikes in people with prediabetes. Participants who did brief walks after each meal saw average glucose reductions of 12 mg/dL compared to those who remained sedentary. Scientists say the movement activates muscle glucose uptake without requiring vigorous exercise. The review calls for larger trials to see if the strategy prevents progression to type 2 diabetes.".to_string(),
        },
    ]
}
