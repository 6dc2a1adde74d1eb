use tera::{Context, Tera};

use crate::error::Result;
use crate::model::Atividade;

/// Compiled-in templates; rendering does not depend on the working directory.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("../templates/layout.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("admin.html", include_str!("../templates/admin.html")),
            ("new.html", include_str!("../templates/new.html")),
            ("edit.html", include_str!("../templates/edit.html")),
            ("detalhes.html", include_str!("../templates/detalhes.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn index(&self, atividades: &[Atividade], is_admin: bool) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("atividades", atividades);
        ctx.insert("is_admin", &is_admin);
        self.render("index.html", &ctx)
    }

    pub fn admin(&self, error: Option<&str>) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("error", &error);
        ctx.insert("is_admin", &false);
        self.render("admin.html", &ctx)
    }

    pub fn new_form(&self) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("is_admin", &true);
        self.render("new.html", &ctx)
    }

    pub fn edit_form(&self, atividade: &Atividade) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("atividade", atividade);
        ctx.insert("is_admin", &true);
        self.render("edit.html", &ctx)
    }

    pub fn detalhes(&self, atividade: &Atividade, is_admin: bool) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("atividade", atividade);
        ctx.insert("is_admin", &is_admin);
        self.render("detalhes.html", &ctx)
    }

    fn render(&self, template: &str, ctx: &Context) -> Result<String> {
        Ok(self.tera.render(template, ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AtividadeDraft;

    fn atividade(subject: &str) -> Atividade {
        AtividadeDraft {
            subject: Some(subject.to_string()),
            description: Some("Lista 1".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .into_atividade(1, None)
    }

    #[test]
    fn index_escapes_user_content() {
        let views = Views::new().unwrap();
        let html = views.index(&[atividade("<script>x</script>")], false).unwrap();
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("/edit/1"));
    }

    #[test]
    fn admin_sees_management_links() {
        let views = Views::new().unwrap();
        let html = views.index(&[atividade("Math")], true).unwrap();
        assert!(html.contains("/edit/1"));
        assert!(html.contains("/delete/1"));
        assert!(html.contains("/new"));
    }

    #[test]
    fn admin_form_shows_error() {
        let views = Views::new().unwrap();
        assert!(views.admin(Some("Senha incorreta")).unwrap().contains("Senha incorreta"));
        assert!(!views.admin(None).unwrap().contains("class=\"error\""));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let views = Views::new().unwrap();
        let html = views.edit_form(&atividade("Math")).unwrap();
        assert!(html.contains("value=\"Math\""));
        assert!(html.contains("action=\"/edit/1\""));
    }
}
