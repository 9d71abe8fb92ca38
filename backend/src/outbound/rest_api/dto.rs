//! Request bodies sent to the REST API.

use serde::Serialize;

use crate::domain::{LoginCredentials, SetDraft, SignupForm};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignupBody<'a> {
    username: &'a str,
    password: &'a str,
    confirm_password: &'a str,
}

impl<'a> From<&'a SignupForm> for SignupBody<'a> {
    /// The form was already checked locally, so the confirmation repeats the
    /// password; the server checks it again.
    fn from(form: &'a SignupForm) -> Self {
        Self {
            username: form.username().as_ref(),
            password: form.password(),
            confirm_password: form.password(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

impl<'a> From<&'a LoginCredentials> for LoginBody<'a> {
    fn from(credentials: &'a LoginCredentials) -> Self {
        Self {
            username: credentials.username(),
            password: credentials.password(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SetBody<'a> {
    title: &'a str,
    taxon_ids: Vec<&'a str>,
}

impl<'a> From<&'a SetDraft> for SetBody<'a> {
    fn from(draft: &'a SetDraft) -> Self {
        Self {
            title: draft.title.as_ref(),
            taxon_ids: draft.taxon_ids.as_slice().iter().map(AsRef::as_ref).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SetTitle, TaxonIds};
    use insta::assert_json_snapshot;
    use rstest::rstest;

    #[rstest]
    fn signup_body_repeats_password_as_confirmation() {
        let form = SignupForm::try_from_parts("ada", "pw1", "pw1").expect("form");
        assert_json_snapshot!(SignupBody::from(&form), @r#"
        {
          "username": "ada",
          "password": "pw1",
          "confirmPassword": "pw1"
        }
        "#);
    }

    #[rstest]
    fn set_body_keeps_id_order() {
        let draft = SetDraft {
            title: SetTitle::new("Birds").expect("title"),
            taxon_ids: TaxonIds::parse(["7", "3"]).expect("ids"),
        };
        assert_json_snapshot!(SetBody::from(&draft), @r#"
        {
          "title": "Birds",
          "taxonIds": [
            "7",
            "3"
          ]
        }
        "#);
    }
}
