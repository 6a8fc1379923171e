use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{NewTodo, Todo, now};

/// Sea-ORM Entity for the todos table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(500))")]
    pub description: String,
    pub completed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Todo {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// The id is left to the database sequence.
impl From<NewTodo> for ActiveModel {
    fn from(todo: NewTodo) -> Self {
        let timestamp = now();
        ActiveModel {
            id: NotSet,
            completed: Set(todo.completed()),
            description: Set(todo.into_description()),
            created_at: Set(timestamp.into()),
            updated_at: Set(timestamp.into()),
        }
    }
}
