//! Disease context catalog: background for each neglected disease the
//! workspace can be focused on.

use repurview_common::DiseaseContext;

#[derive(Debug, Clone)]
pub struct DiseaseCatalog {
    diseases: Vec<DiseaseContext>,
}

impl DiseaseCatalog {
    pub fn new(diseases: Vec<DiseaseContext>) -> Self {
        Self { diseases }
    }

    /// The five diseases offered by the disease selector, in selector order.
    pub fn standard() -> Self {
        let entry = |key: &str, label: &str, name: &str, region: &str, challenge: &str| {
            DiseaseContext {
                key: key.to_string(),
                label: label.to_string(),
                name: name.to_string(),
                region: region.to_string(),
                challenge: challenge.to_string(),
            }
        };
        Self::new(vec![
            entry(
                "dengue",
                "Dengue",
                "Dengue Fever",
                "Southeast Asia, Latin America, Africa",
                "No approved antiviral treatment exists. Current therapy is supportive only. \
                 Severe cases can lead to hemorrhagic fever.",
            ),
            entry(
                "malaria",
                "Malaria",
                "Malaria",
                "Sub-Saharan Africa, South Asia",
                "Growing resistance to artemisinin-based treatments. Need for new drug \
                 candidates with novel mechanisms of action.",
            ),
            entry(
                "zika",
                "Zika Virus",
                "Zika Virus",
                "Americas, Pacific Islands, Southeast Asia",
                "No specific treatment available. Associated with birth defects. Vaccine \
                 development ongoing but not yet approved.",
            ),
            entry(
                "chikungunya",
                "Chikungunya",
                "Chikungunya",
                "Africa, Asia, Indian Subcontinent, Americas",
                "No approved vaccines or antivirals. Chronic joint pain persists in 40% of \
                 patients. Limited therapeutic options.",
            ),
            entry(
                "tuberculosis",
                "Tuberculosis",
                "Tuberculosis",
                "Global, highest burden in Asia and Africa",
                "Multi-drug resistant strains increasing. Current treatment requires 6+ \
                 months. Need for shorter, more effective regimens.",
            ),
        ])
    }

    pub fn list(&self) -> &[DiseaseContext] {
        &self.diseases
    }

    /// Look up by key, label or full name, ignoring case, so a hypothesis's
    /// `target_disease` resolves too.
    pub fn get(&self, disease: &str) -> Option<&DiseaseContext> {
        let needle = disease.trim().to_lowercase();
        self.diseases.iter().find(|d| {
            [&d.key, &d.label, &d.name]
                .into_iter()
                .any(|s| s.to_lowercase() == needle)
        })
    }
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
