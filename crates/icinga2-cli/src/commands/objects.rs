//! Object command handlers.

use icinga2_api::{Client, DeleteQuery, Joins, ListQuery, NewObject};

use crate::cli::{AttrArgs, GlobalOpts, ObjectsArgs, ObjectsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn list_query(attrs: AttrArgs) -> ListQuery {
    let mut query = ListQuery::new().attrs(attrs.attrs);
    if attrs.all_joins {
        query = query.joins(Joins::All);
    } else if !attrs.joins.is_empty() {
        query = query.joins(Joins::Fields(attrs.joins));
    }
    query
}

pub async fn handle(
    client: &Client,
    args: ObjectsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let objects = client.objects();

    match args.command {
        ObjectsCommand::List {
            object_type,
            name,
            attrs,
            filter,
        } => {
            let mut query = list_query(attrs);
            if let Some(name) = name {
                query = query.name(name);
            }
            if let Some(filter) = util::optional_filter(filter) {
                query = query.filter(filter);
            }
            let results = objects.list(object_type, &query).await?;
            output::emit(global.output, &results)
        }

        ObjectsCommand::Get {
            object_type,
            name,
            attrs,
        } => {
            let object = objects.get(object_type, &name, &list_query(attrs)).await?;
            output::emit(global.output, &object)
        }

        ObjectsCommand::Create {
            object_type,
            name,
            templates,
            attrs,
            from_file,
        } => {
            let object = NewObject {
                templates,
                attrs: util::collect_attrs(from_file.as_deref(), attrs)?,
            };
            let response = objects.create(object_type, &name, &object).await?;
            output::emit(global.output, &response)
        }

        ObjectsCommand::Update {
            object_type,
            name,
            attrs,
            from_file,
        } => {
            let attrs = util::collect_attrs(from_file.as_deref(), attrs)?;
            let response = objects.update(object_type, &name, attrs).await?;
            output::emit(global.output, &response)
        }

        ObjectsCommand::Delete {
            object_type,
            name,
            filter,
            no_cascade,
        } => {
            let query = DeleteQuery {
                name,
                filter: util::optional_filter(filter),
                cascade: !no_cascade,
            };
            let response = objects.delete(object_type, &query).await?;
            output::emit(global.output, &response)
        }
    }
}
