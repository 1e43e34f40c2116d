//! Sign-in fallback. Credentials are handled by the authentication service.

/// Heading shown on the sign-in page
pub const LOGIN_TITLE: &str = "Connexion";

/// Sign-in fallback page
#[must_use]
pub fn render() -> String {
    format!(
        "<div class=\"login-page\" data-testid=\"login-page\">\
         <h2>{LOGIN_TITLE}</h2>\
         <p>Connectez-vous en tant qu&#39;employé pour accéder à vos notes de frais.</p>\
         </div>"
    )
}
