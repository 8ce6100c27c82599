use fatoura_core::suggestions::SuggestionRequest;

/// Instruction sent to the model for one suggestion request.
pub fn build_prompt(request: &SuggestionRequest) -> String {
    format!(
        "Tu es un assistant spécialisé dans la facturation pour les entreprises tunisiennes.
Génère des lignes de facture détaillées basées sur la description suivante.

CONTEXTE:
- Entreprise: {business}
- Description du projet/service: {context}
- Pays: Tunisie (TVA standard 19%)

INSTRUCTIONS:
1. Analyse la description et crée entre 2-5 lignes de facture pertinentes
2. Utilise des prix réalistes en Dinars Tunisiens (TND)
3. Respecte la TVA tunisienne de 19% (sauf exceptions justifiées)
4. Utilise des descriptions professionnelles en français
5. Sois précis sur les quantités et unités

RÉPONSE ATTENDUE (JSON uniquement):
{{
  \"items\": [
    {{
      \"description\": \"Description détaillée du service/produit\",
      \"quantite\": 1,
      \"prix_unitaire\": 0,
      \"tva_rate\": 19
    }}
  ]
}}

Réponds UNIQUEMENT avec le JSON, sans texte additionnel.",
        business = request.business_label(),
        context = request.context.trim(),
    )
}

#[cfg(test)]
mod tests {
    use fatoura_core::suggestions::SuggestionRequest;

    use super::build_prompt;

    #[test]
    fn prompt_interpolates_business_and_context() {
        let prompt =
            build_prompt(&SuggestionRequest::new("  Refonte du site vitrine ", "Atelier Médina"));

        assert!(prompt.contains("- Entreprise: Atelier Médina"));
        assert!(prompt.contains("- Description du projet/service: Refonte du site vitrine\n"));
        assert!(prompt.contains("\"tva_rate\": 19"));
        assert!(prompt.contains("entre 2-5 lignes"));
    }

    #[test]
    fn blank_business_falls_back_to_generic_label() {
        let prompt = build_prompt(&SuggestionRequest::new("formation", ""));
        assert!(prompt.contains("- Entreprise: Entreprise"));
    }
}
