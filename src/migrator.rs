use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_clients_table::Migration),
            Box::new(m20240101_000002_create_cars_table::Migration),
            Box::new(m20240101_000003_create_bookings_table::Migration),
            Box::new(m20240101_000004_create_work_orders_table::Migration),
            Box::new(m20240101_000005_create_line_item_tables::Migration),
            Box::new(m20240101_000006_create_payments_table::Migration),
            Box::new(m20240101_000007_create_audit_log_table::Migration),
        ]
    }
}

mod m20240101_000001_create_clients_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Clients::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Clients::FullName).string().not_null())
                        .col(ColumnDef::new(Clients::Phone).string().not_null())
                        .col(ColumnDef::new(Clients::Email).string())
                        .col(
                            ColumnDef::new(Clients::IsArchived)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Clients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Clients {
        Table,
        Id,
        FullName,
        Phone,
        Email,
        IsArchived,
        CreatedAt,
    }
}

mod m20240101_000002_create_cars_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_cars_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Cars::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Cars::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Cars::ClientId).big_integer().not_null())
                        .col(ColumnDef::new(Cars::Brand).string().not_null())
                        .col(ColumnDef::new(Cars::Model).string().not_null())
                        .col(ColumnDef::new(Cars::PlateNumber).string())
                        .col(ColumnDef::new(Cars::Vin).string())
                        .col(ColumnDef::new(Cars::Year).integer())
                        .col(
                            ColumnDef::new(Cars::IsArchived)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Cars::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cars_client_id")
                                .from(Cars::Table, Cars::ClientId)
                                .to(Clients::Table, Clients::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_cars_client_id")
                        .table(Cars::Table)
                        .col(Cars::ClientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Cars::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Cars {
        Table,
        Id,
        ClientId,
        Brand,
        Model,
        PlateNumber,
        Vin,
        Year,
        IsArchived,
        CreatedAt,
    }
}

mod m20240101_000003_create_bookings_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;
    use super::m20240101_000002_create_cars_table::Cars;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_bookings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bookings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Bookings::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Bookings::ClientId).big_integer().not_null())
                        .col(ColumnDef::new(Bookings::CarId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Bookings::ScheduledAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Bookings::Note).string())
                        .col(
                            ColumnDef::new(Bookings::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(Bookings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookings_client_id")
                                .from(Bookings::Table, Bookings::ClientId)
                                .to(Clients::Table, Clients::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookings_car_id")
                                .from(Bookings::Table, Bookings::CarId)
                                .to(Cars::Table, Cars::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bookings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Bookings {
        Table,
        Id,
        ClientId,
        CarId,
        ScheduledAt,
        Note,
        Status,
        CreatedAt,
    }
}

mod m20240101_000004_create_work_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000003_create_bookings_table::Bookings;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_work_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WorkOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkOrders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        // one work order per booking
                        .col(
                            ColumnDef::new(WorkOrders::BookingId)
                                .big_integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::ClientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkOrders::CarId).big_integer().not_null())
                        .col(ColumnDef::new(WorkOrders::Description).string())
                        .col(
                            ColumnDef::new(WorkOrders::Status)
                                .string()
                                .not_null()
                                .default("created"),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::PaidAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::IsArchived)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_work_orders_booking_id")
                                .from(WorkOrders::Table, WorkOrders::BookingId)
                                .to(Bookings::Table, Bookings::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum WorkOrders {
        Table,
        Id,
        BookingId,
        ClientId,
        CarId,
        Description,
        Status,
        TotalAmount,
        PaidAmount,
        IsArchived,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_line_item_tables {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000004_create_work_orders_table::WorkOrders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_line_item_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WorkItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkItems::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(WorkItems::WorkOrderId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkItems::Name).string().not_null())
                        .col(ColumnDef::new(WorkItems::Qty).decimal_len(12, 2).not_null())
                        .col(
                            ColumnDef::new(WorkItems::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_work_items_work_order_id")
                                .from(WorkItems::Table, WorkItems::WorkOrderId)
                                .to(WorkOrders::Table, WorkOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_work_items_work_order_id")
                        .table(WorkItems::Table)
                        .col(WorkItems::WorkOrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaterialItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialItems::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(MaterialItems::WorkOrderId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialItems::MaterialId).big_integer())
                        .col(ColumnDef::new(MaterialItems::Name).string().not_null())
                        .col(
                            ColumnDef::new(MaterialItems::Qty)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialItems::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_material_items_work_order_id")
                                .from(MaterialItems::Table, MaterialItems::WorkOrderId)
                                .to(WorkOrders::Table, WorkOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_material_items_work_order_id")
                        .table(MaterialItems::Table)
                        .col(MaterialItems::WorkOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaterialItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WorkItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum WorkItems {
        Table,
        Id,
        WorkOrderId,
        Name,
        Qty,
        UnitPrice,
    }

    #[derive(DeriveIden)]
    pub enum MaterialItems {
        Table,
        Id,
        WorkOrderId,
        MaterialId,
        Name,
        Qty,
        UnitPrice,
    }
}

mod m20240101_000006_create_payments_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000004_create_work_orders_table::WorkOrders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Payments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Payments::WorkOrderId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::Amount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Payments::Method).string().not_null())
                        .col(
                            ColumnDef::new(Payments::Status)
                                .string()
                                .not_null()
                                .default("paid"),
                        )
                        .col(ColumnDef::new(Payments::PaidAt).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Payments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_work_order_id")
                                .from(Payments::Table, Payments::WorkOrderId)
                                .to(WorkOrders::Table, WorkOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_payments_work_order_id")
                        .table(Payments::Table)
                        .col(Payments::WorkOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Payments {
        Table,
        Id,
        WorkOrderId,
        Amount,
        Method,
        Status,
        PaidAt,
        CreatedAt,
    }
}

mod m20240101_000007_create_audit_log_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_audit_log_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AuditLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AuditLog::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(AuditLog::Entity).string().not_null())
                        .col(ColumnDef::new(AuditLog::EntityId).big_integer().not_null())
                        .col(ColumnDef::new(AuditLog::Action).string().not_null())
                        .col(ColumnDef::new(AuditLog::Details).json().not_null())
                        .col(
                            ColumnDef::new(AuditLog::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_audit_log_entity")
                        .table(AuditLog::Table)
                        .col(AuditLog::Entity)
                        .col(AuditLog::EntityId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditLog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum AuditLog {
        Table,
        Id,
        Entity,
        EntityId,
        Action,
        Details,
        CreatedAt,
    }
}
