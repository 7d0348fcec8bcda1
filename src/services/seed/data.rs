//! 示例数据常量

use crate::models::users::entities::UserRole;

pub struct SeedAccount {
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: UserRole,
    pub phone: &'static str,
}

pub const SUPERUSER: SeedAccount = SeedAccount {
    username: "SuperKatie",
    email: "superkatie@lms.com",
    password: "lms-password123",
    first_name: "Super",
    last_name: "Katie",
    role: UserRole::Admin,
    phone: "555-0001",
};

pub const SAMPLE_PASSWORD: &str = "password123";

pub const SAMPLE_ACCOUNTS: [SeedAccount; 3] = [
    SeedAccount {
        username: "student1",
        email: "student1@lms.com",
        password: SAMPLE_PASSWORD,
        first_name: "Alice",
        last_name: "Student",
        role: UserRole::Student,
        phone: "555-0002",
    },
    SeedAccount {
        username: "instructor1",
        email: "instructor1@lms.com",
        password: SAMPLE_PASSWORD,
        first_name: "Bob",
        last_name: "Professor",
        role: UserRole::Instructor,
        phone: "555-0003",
    },
    SeedAccount {
        username: "admin1",
        email: "admin1@lms.com",
        password: SAMPLE_PASSWORD,
        first_name: "Carol",
        last_name: "Administrator",
        role: UserRole::Admin,
        phone: "555-0004",
    },
];

pub const COURSE_CODE: &str = "MATH102";
pub const COURSE_NAME: &str = "Intermediate Mathematics";
pub const COURSE_DESCRIPTION: &str = "A comprehensive introduction to intermediate mathematical concepts including arithmetic, basic algebra, and problem-solving techniques.";
pub const COURSE_CREDITS: i32 = 3;
pub const COURSE_TERM: &str = "Spring 2025";
pub const COURSE_MAX_ENROLLMENT: i32 = 30;

pub const MODULE_NAME: &str = "Module 1: Addition";
pub const MODULE_DESCRIPTION: &str =
    "Introduction to addition operations and basic arithmetic principles.";
pub const MODULE_ORDER: i32 = 1;
pub const MODULE_CONTENT: &str = "# Module 1: Addition

## Learning Objectives
- Understand the concept of addition
- Perform basic addition operations
- Apply addition to real-world problems

## Content
Addition is one of the four basic operations of arithmetic. In this module, you will learn:
1. What addition means
2. How to add single-digit numbers
3. How to add multi-digit numbers
4. Word problems involving addition

## Practice Problems
Complete the assignment to practice what you've learned!
";

pub const ASSIGNMENT_NAME: &str = "Addition Practice Problems";
pub const ASSIGNMENT_DESCRIPTION: &str =
    "Practice problems to reinforce addition concepts learned in Module 1.";
pub const ASSIGNMENT_DUE_IN_DAYS: i64 = 14;
pub const ASSIGNMENT_MAX_POINTS: i32 = 100;
pub const ASSIGNMENT_INSTRUCTIONS: &str = "Complete the following addition problems:

1. 25 + 37 = ?
2. 156 + 289 = ?
3. 1,247 + 3,856 = ?
4. Word Problem: Sarah has 45 apples and John gives her 28 more apples. How many apples does Sarah have now?
5. Word Problem: A school has 234 students in the morning. 67 more students arrive for the afternoon session. What is the total number of students?

Show your work for each problem. Partial credit will be given for correct methodology even if the final answer is incorrect.
";

pub const SUBMISSION_CONTENT: &str = "My solutions to the addition problems:

1. 25 + 37 = 62
2. 156 + 289 = 445
3. 1,247 + 3,856 = 5,103
4. Sarah has 45 + 28 = 73 apples
5. Total students = 234 + 67 = 301 students

I showed my work by adding the numbers step by step. For the multi-digit problems, I aligned the numbers by place value and added column by column, carrying over when necessary.
";
pub const SUBMISSION_GRADE: f64 = 95.0;
pub const SUBMISSION_FEEDBACK: &str = "Excellent work! All answers are correct and you showed clear methodology. Keep up the good work!";
