use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum EditEntries {
    Table,
    Id,
    ExpenseId,
    EditorId,
    EditorName,
    RecordedAt,
    BeforeName,
    BeforeAmount,
    BeforeCategory,
    BeforeDescription,
    BeforeDate,
    AfterName,
    AfterAmount,
    AfterCategory,
    AfterDescription,
    AfterDate,
    Changes,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    EditCount,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EditEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EditEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EditEntries::ExpenseId).string().not_null())
                    .col(ColumnDef::new(EditEntries::EditorId).string().not_null())
                    .col(ColumnDef::new(EditEntries::EditorName).string().not_null())
                    .col(
                        ColumnDef::new(EditEntries::RecordedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EditEntries::BeforeName).string().not_null())
                    .col(
                        ColumnDef::new(EditEntries::BeforeAmount)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EditEntries::BeforeCategory).string())
                    .col(ColumnDef::new(EditEntries::BeforeDescription).string())
                    .col(ColumnDef::new(EditEntries::BeforeDate).string())
                    .col(ColumnDef::new(EditEntries::AfterName).string().not_null())
                    .col(ColumnDef::new(EditEntries::AfterAmount).string().not_null())
                    .col(ColumnDef::new(EditEntries::AfterCategory).string())
                    .col(ColumnDef::new(EditEntries::AfterDescription).string())
                    .col(ColumnDef::new(EditEntries::AfterDate).string())
                    .col(ColumnDef::new(EditEntries::Changes).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-edit_entries-expense_id")
                            .from(EditEntries::Table, EditEntries::ExpenseId)
                            .to(Expenses::Table, Expenses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-edit_entries-expense_id")
                    .table(EditEntries::Table)
                    .col(EditEntries::ExpenseId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Expenses::Table)
                    .add_column(
                        ColumnDef::new(Expenses::EditCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EditEntries::Table).to_owned())
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Expenses::Table)
                    .drop_column(Expenses::EditCount)
                    .to_owned(),
            )
            .await
    }
}
