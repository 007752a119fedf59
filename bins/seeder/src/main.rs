//! Database seeder for Unifin development and testing.
//!
//! Seeds two departments, one user per role, a student profile, and a
//! semester fee structure for local development. The central balance
//! row is created by the initial migration.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use unifin_core::auth::hash_password;
use unifin_db::entities::{
    departments, fee_structures,
    sea_orm_active_enums::UserRole,
    students, users,
};

/// Engineering department ID (consistent for all seeds).
const ENGINEERING_DEPT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Science department ID (consistent for all seeds).
const SCIENCE_DEPT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Semester fee structure ID (consistent for all seeds).
const SEMESTER_FEE_ID: &str = "00000000-0000-0000-0000-000000000010";

/// Password for every seeded account.
const DEV_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = unifin_db::connect(&database_url, 5, 1)
        .await
        .expect("Failed to connect to database");

    println!("Seeding departments...");
    seed_departments(&db).await;

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding fee structure...");
    seed_fee_structure(&db).await;

    println!("Seeding complete!");
}

fn fixed_id(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("seed UUID constants are valid")
}

async fn seed_departments(db: &DatabaseConnection) {
    for (id, name) in [
        (ENGINEERING_DEPT_ID, "Engineering"),
        (SCIENCE_DEPT_ID, "Science"),
    ] {
        let id = fixed_id(id);
        if departments::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Department {name} already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let department = departments::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            head_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = department.insert(db).await {
            eprintln!("Failed to insert department {name}: {e}");
        } else {
            println!("  Created department: {name}");
        }
    }
}

async fn seed_users(db: &DatabaseConnection) {
    let engineering = fixed_id(ENGINEERING_DEPT_ID);
    let password_hash = hash_password(DEV_PASSWORD).expect("password hashing");

    let accounts: [(&str, &str, UserRole, Option<Uuid>); 6] = [
        ("Admin User", "admin@unifin.dev", UserRole::Admin, None),
        (
            "Finance Manager",
            "finance@unifin.dev",
            UserRole::FinanceManager,
            None,
        ),
        (
            "Head of Engineering",
            "hod@unifin.dev",
            UserRole::DepartmentHead,
            Some(engineering),
        ),
        (
            "Faculty Member",
            "faculty@unifin.dev",
            UserRole::Faculty,
            Some(engineering),
        ),
        (
            "Staff Member",
            "staff@unifin.dev",
            UserRole::Staff,
            Some(engineering),
        ),
        (
            "Test Student",
            "student@unifin.dev",
            UserRole::Student,
            Some(engineering),
        ),
    ];

    for (full_name, email, role, department_id) in accounts {
        match seed_user(db, full_name, email, role.clone(), department_id, &password_hash).await {
            Ok(Some(user)) => {
                println!("  Created user: {email}");
                if role == UserRole::Student {
                    seed_student_profile(db, user.id).await;
                }
            }
            Ok(None) => println!("  User {email} already exists, skipping..."),
            Err(e) => eprintln!("Failed to insert user {email}: {e}"),
        }
    }
}

async fn seed_user(
    db: &DatabaseConnection,
    full_name: &str,
    email: &str,
    role: UserRole,
    department_id: Option<Uuid>,
    password_hash: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    use sea_orm::{ColumnTrait, QueryFilter};

    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(None);
    }

    let now = Utc::now().into();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(full_name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        role: Set(role),
        department_id: Set(department_id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok(Some(user))
}

async fn seed_student_profile(db: &DatabaseConnection, user_id: Uuid) {
    let batch = Utc::now().year().to_string();
    let student = students::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        enrollment_no: Set("ENG-0001".to_string()),
        batch: Set(batch),
        program: Set("B.Tech Computer Science".to_string()),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = student.insert(db).await {
        eprintln!("Failed to insert student profile: {e}");
    } else {
        println!("  Created student profile: ENG-0001");
    }
}

async fn seed_fee_structure(db: &DatabaseConnection) {
    let id = fixed_id(SEMESTER_FEE_ID);
    if fee_structures::Entity::find_by_id(id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Fee structure already exists, skipping...");
        return;
    }

    let due_date = (Utc::now() + Duration::days(30)).date_naive();
    let structure = fee_structures::ActiveModel {
        id: Set(id),
        name: Set("Semester Tuition Fee".to_string()),
        description: Set(Some("Tuition for the current semester".to_string())),
        amount: Set(Decimal::from(50_000)),
        due_date: Set(due_date),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = structure.insert(db).await {
        eprintln!("Failed to insert fee structure: {e}");
    } else {
        println!("  Created fee structure: Semester Tuition Fee");
    }
}
