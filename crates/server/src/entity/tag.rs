use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submission_tag::Entity")]
    SubmissionTag,
}

impl Related<super::submission_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionTag.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        super::submission_tag::Relation::Submission.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::submission_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
