//! Default payloads written the first time each collection is read.

use crate::models::{
    AdminCredentials, Post, PostCategory, SiteSettings, StudentPerformance, Testimonial,
};

pub const DEFAULT_SCHOOL_NAME: &str = "Brilliant Primary School";

pub fn initial_posts() -> Vec<Post> {
    vec![
        Post {
            id: "1".to_string(),
            title: "Annual Alumni Reunion 2024".to_string(),
            content: "We are thrilled to announce the Annual Alumni Reunion! Join us for a night of nostalgia, networking, and celebration. All batches from 1990-2020 are warmly invited.".to_string(),
            date: "2024-10-15".to_string(),
            category: PostCategory::Reunion,
            author: "Admin".to_string(),
            image_url: Some("https://picsum.photos/800/400".to_string()),
        },
        Post {
            id: "2".to_string(),
            title: "Spring Science Fair Winners".to_string(),
            content: "Congratulations to all participants of the Spring Science Fair. Special mention to the 10th-grade robotics team for their innovative solar-powered rover.".to_string(),
            date: "2024-05-20".to_string(),
            category: PostCategory::News,
            author: "Admin".to_string(),
            image_url: Some("https://picsum.photos/800/401".to_string()),
        },
    ]
}

pub fn initial_performance() -> Vec<StudentPerformance> {
    let record = |id: &str, year, name: &str, agg, achievements: &str, photo: &str| {
        StudentPerformance {
            id: id.to_string(),
            year,
            student_name: name.to_string(),
            grade: "12th Grade".to_string(),
            agg,
            achievements: achievements.to_string(),
            photo_url: Some(photo.to_string()),
        }
    };

    vec![
        record(
            "p1",
            2023,
            "Sarah Jenkins",
            8.0,
            "Valedictorian, State Math Champion",
            "https://picsum.photos/200/200",
        ),
        record(
            "p2",
            2022,
            "Michael Chen",
            10.0,
            "National Merit Scholar",
            "https://picsum.photos/201/201",
        ),
        record(
            "p3",
            2021,
            "Emily Davis",
            9.0,
            "Debate Club President",
            "https://picsum.photos/202/202",
        ),
    ]
}

pub fn initial_settings() -> SiteSettings {
    SiteSettings {
        school_name: DEFAULT_SCHOOL_NAME.to_string(),
        logo_url: None,
        marquee_text: "Welcome to Brilliant Primary School! Admissions for the upcoming academic year are now open.".to_string(),
        hero_images: vec![
            "https://picsum.photos/1920/600?blur=2".to_string(),
            "https://picsum.photos/1920/600?random=10".to_string(),
            "https://picsum.photos/1920/600?random=20".to_string(),
        ],
    }
}

pub fn initial_credentials() -> AdminCredentials {
    AdminCredentials {
        username: "admin".to_string(),
        password: "admin".to_string(),
    }
}

pub fn initial_testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            id: "t1".to_string(),
            user_name: "Alice Johnson".to_string(),
            user_class: "Class of 2015".to_string(),
            user_photo: Some("https://randomuser.me/api/portraits/women/44.jpg".to_string()),
            content: "Brilliant Primary School provided the foundation for my academic success. The dedicated teachers and holistic curriculum prepared me well for high school and beyond.".to_string(),
            rating: 5,
            date: "2023-08-12".to_string(),
        },
        Testimonial {
            id: "t2".to_string(),
            user_name: "David Smith".to_string(),
            user_class: "Class of 2010".to_string(),
            user_photo: Some("https://randomuser.me/api/portraits/men/32.jpg".to_string()),
            content: "I have fond memories of the sports programs and extracurricular activities. It was a truly enriching environment to grow up in.".to_string(),
            rating: 4,
            date: "2023-09-25".to_string(),
        },
    ]
}
