use thiserror::Error;

use lottorama_db::models::{Pool, Ticket};

/// Erreur de saisie. Collectée plutôt que fatale : la boucle de session
/// réaffiche l'invite tant que le groupe n'est pas valide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{0}")]
    Format(String),

    #[error("{0}")]
    Range(String),

    #[error("{0}")]
    Cardinality(String),

    #[error("{0}")]
    Uniqueness(String),
}

/// Valide les 5 boules à partir des jetons déjà découpés sur les virgules.
/// Toutes les violations sont rendues ensemble, sauf la cardinalité qui
/// court-circuite et masque les autres erreurs pour ce groupe.
pub fn validate_balls(tokens: &[&str]) -> Result<[u8; 5], Vec<InputError>> {
    let mut errors = Vec::new();

    if tokens.iter().any(|t| t.contains(char::is_whitespace)) {
        errors.push(InputError::Format(
            "espaces interdits entre les valeurs et les virgules".to_string(),
        ));
    }

    let values = parse_tokens(tokens, &mut errors);

    if tokens.len() != Pool::Balls.pick_count() {
        return Err(vec![InputError::Cardinality(
            "exactement 5 numéros sont attendus".to_string(),
        )]);
    }

    for &v in &values {
        if v < 1 || v > Pool::Balls.size() as i64 {
            errors.push(InputError::Range(format!(
                "boule {} hors limites (1-50)",
                v
            )));
        }
    }

    push_duplicate_errors(&values, "boule", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut balls = [0u8; 5];
    for (i, &v) in values.iter().enumerate() {
        balls[i] = v as u8;
    }
    Ok(balls)
}

/// Valide les 2 étoiles. Les espaces sont rejetés d'emblée ; ensuite
/// format, cardinalité, bornes et unicité sont tous rendus ensemble,
/// sans court-circuit.
pub fn validate_stars(tokens: &[&str]) -> Result<[u8; 2], Vec<InputError>> {
    let mut errors = Vec::new();

    if tokens.iter().any(|t| t.contains(char::is_whitespace)) {
        errors.push(InputError::Format(
            "espaces interdits entre les valeurs et les virgules".to_string(),
        ));
    }

    let values = parse_tokens(tokens, &mut errors);

    if tokens.len() != Pool::Stars.pick_count() {
        errors.push(InputError::Cardinality(
            "exactement 2 étoiles sont attendues".to_string(),
        ));
    }

    for &v in &values {
        if v < 1 || v > Pool::Stars.size() as i64 {
            errors.push(InputError::Range(format!(
                "étoile {} hors limites (1-12)",
                v
            )));
        }
    }

    push_duplicate_errors(&values, "étoile", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok([values[0] as u8, values[1] as u8])
}

/// Valide les 2 numéros conservés pour une demande de prédiction :
/// ils doivent appartenir aux boules de la grille du joueur.
pub fn validate_held(tokens: &[&str], ticket: &Ticket) -> Result<[u8; 2], Vec<InputError>> {
    let mut errors = Vec::new();

    let mut values = Vec::with_capacity(tokens.len());
    for token in tokens {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            errors.push(InputError::Format("valeur vide".to_string()));
            continue;
        }
        match trimmed.parse::<i64>() {
            Ok(v) => values.push(v),
            Err(_) => errors.push(InputError::Format(format!(
                "impossible de lire '{}' comme un nombre entier",
                trimmed
            ))),
        }
    }

    if tokens.len() != 2 {
        errors.push(InputError::Cardinality(
            "exactement 2 numéros à conserver sont attendus".to_string(),
        ));
    }

    for &v in &values {
        if !ticket.balls.iter().any(|&b| i64::from(b) == v) {
            errors.push(InputError::Range(format!(
                "le numéro {} ne figure pas sur votre grille",
                v
            )));
        }
    }

    push_duplicate_errors(&values, "numéro", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok([values[0] as u8, values[1] as u8])
}

fn parse_tokens(tokens: &[&str], errors: &mut Vec<InputError>) -> Vec<i64> {
    let mut values = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token.trim().parse::<i64>() {
            Ok(v) => values.push(v),
            Err(_) => errors.push(InputError::Format(format!(
                "impossible de lire '{}' comme un nombre entier",
                token.trim()
            ))),
        }
    }
    values
}

fn push_duplicate_errors(values: &[i64], label: &str, errors: &mut Vec<InputError>) {
    let mut reported = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if values[..i].contains(&v) && !reported.contains(&v) {
            reported.push(v);
            errors.push(InputError::Uniqueness(format!(
                "{} en double : {}",
                label, v
            )));
        }
    }
}
